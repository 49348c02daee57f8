mod thr_calculator;
mod thr_service;

pub use thr_calculator::ThrCalculator;
pub use thr_service::ThrService;
