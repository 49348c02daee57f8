// Loans module
//
// Employee loans repaid through payroll: origination, per-period deduction
// and the append-only payment ledger.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::{create_loan, get_loan, get_loan_payments};
pub use models::{
    Loan, LoanDeduction, LoanDeductionLine, LoanPayment, LoanSchedule, LoanStatus,
};
pub use repositories::{LoanRepository, MySqlLoanRepository};
pub use services::LoanLedger;
