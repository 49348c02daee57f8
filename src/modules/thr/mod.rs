// THR module
//
// Religious holiday allowance (Tunjangan Hari Raya): one month of base salary
// after a year of service, pro-rated by whole months below that.

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::calculate_thr;
pub use models::{ThrBatchResult, ThrCategory, ThrFailure, ThrResult, ThrSummary};
pub use services::{ThrCalculator, ThrService};
