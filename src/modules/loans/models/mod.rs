mod loan;
mod loan_payment;

pub use loan::{Loan, LoanDeduction, LoanDeductionLine, LoanSchedule, LoanStatus};
pub use loan_payment::LoanPayment;
