//! Gajian payroll engine
//!
//! Monthly payroll for Indonesian employers: BPJS contributions, PPh 21
//! withholding, attendance-based pay, employee loans and THR.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::contributions;
pub use modules::employees;
pub use modules::loans;
pub use modules::payroll;
pub use modules::thr;
pub use modules::withholding;
