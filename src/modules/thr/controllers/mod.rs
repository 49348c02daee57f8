mod thr_controller;

pub use thr_controller::{calculate_thr, configure};
