mod payroll_repository;

pub use payroll_repository::{MySqlPayrollBatch, MySqlPayrollRepository, PayrollBatch, PayrollRepository};
