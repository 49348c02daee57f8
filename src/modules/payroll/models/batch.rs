use serde::{Deserialize, Serialize};

use crate::modules::loans::LoanDeduction;
use crate::modules::payroll::models::{PeriodTotals, Payslip};

/// A computed payslip together with the loan deduction it shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipComputation {
    pub payslip: Payslip,
    pub loan_deduction: LoanDeduction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    pub employee_id: String,
    pub message: String,
}

/// Outcome of one batch run over a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub period_id: String,
    pub success_count: usize,
    pub failed_count: usize,
    pub failures: Vec<EmployeeFailure>,
    /// Employees with a payslip from an earlier run
    pub skipped: Vec<String>,
    pub totals: PeriodTotals,
}
