// Payroll module
//
// Pay periods, payslips and the batch run that ties the calculators,
// the HR inputs and the loan ledger together.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    BatchResult, EmployeeFailure, PayPeriod, PayrollSettings, Payslip, PayslipComputation,
    PayslipStatus, PeriodStatus, PeriodTotals,
};
pub use repositories::{MySqlPayrollRepository, PayrollBatch, PayrollRepository};
pub use services::PayslipOrchestrator;
