pub mod controllers;

pub use controllers::health_check;
