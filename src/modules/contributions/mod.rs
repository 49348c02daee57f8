// Contributions module
//
// BPJS Ketenagakerjaan (JHT, JKK, JKM, JP) and BPJS Kesehatan contributions
// with employer/employee splits and per-scheme wage caps.

pub mod models;
pub mod services;

pub use models::{ContributionRates, ContributionResult};
pub use services::{validate_wage, BpjsContributionCalculator, ContributionCalculator};
