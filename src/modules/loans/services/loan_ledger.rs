// Loan ledger: plans payroll deductions and applies them to loan balances.
//
// Applying a deduction is a ledger transaction: read the current balance,
// compute the next state, write the loan and the new payment row together.
// The payslip id is the idempotency key; a second application for the same
// payslip is rejected.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::loans::{
    models::{Loan, LoanDeduction, LoanPayment, LoanSchedule},
    repositories::LoanRepository,
};

/// Service over the loan tables
#[derive(Clone)]
pub struct LoanLedger {
    repository: Arc<dyn LoanRepository>,
}

impl LoanLedger {
    pub fn new(repository: Arc<dyn LoanRepository>) -> Self {
        Self { repository }
    }

    /// Create a new active loan
    pub async fn originate(
        &self,
        employee_id: String,
        principal: Decimal,
        tenor_months: i32,
        start_date: NaiveDate,
    ) -> Result<Loan> {
        let loan = Loan::new(employee_id, principal, tenor_months, start_date)?;
        self.repository.create(&loan).await?;

        info!(
            loan_id = loan.id.as_str(),
            employee_id = loan.employee_id.as_str(),
            principal = %loan.principal,
            installment = %loan.monthly_installment,
            "Loan originated"
        );

        Ok(loan)
    }

    pub async fn get_loan(&self, loan_id: &str) -> Result<Loan> {
        self.repository
            .find_by_id(loan_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Loan '{}' not found", loan_id)))
    }

    /// Payment history of a loan, oldest first
    pub async fn payments(&self, loan_id: &str) -> Result<Vec<LoanPayment>> {
        self.get_loan(loan_id).await?;
        self.repository.payments_for_loan(loan_id).await
    }

    /// Loan, its ledger and the installments still expected
    pub async fn schedule(&self, loan_id: &str) -> Result<LoanSchedule> {
        let loan = self.get_loan(loan_id).await?;
        let payments = self.repository.payments_for_loan(loan_id).await?;

        Ok(LoanSchedule {
            remaining_installments: loan.remaining_installments(),
            loan,
            payments,
        })
    }

    /// Deduction due this period across the employee's active loans. Read only.
    pub async fn compute_deduction(&self, employee_id: &str) -> Result<LoanDeduction> {
        let loans = self.repository.find_active_by_employee(employee_id).await?;
        Ok(LoanDeduction::from_loans(employee_id, &loans))
    }

    /// Apply a planned deduction for `payslip_id` atomically.
    ///
    /// # Errors
    /// * `Conflict` - the payslip was already applied, or a loan balance
    ///   dropped below the planned amount since it was computed
    pub async fn commit(
        &self,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<Vec<LoanPayment>> {
        if deduction.is_empty() {
            return Ok(Vec::new());
        }

        let payments = self
            .repository
            .apply_deduction(deduction, payslip_id, payment_date)
            .await?;

        info!(
            employee_id = deduction.employee_id.as_str(),
            payslip_id = payslip_id,
            loans = payments.len(),
            total = %deduction.total,
            "Loan deductions committed"
        );

        Ok(payments)
    }

    /// Reject a second application for the same payslip
    pub fn ensure_not_applied(existing: &[LoanPayment], payslip_id: &str) -> Result<()> {
        if existing.iter().any(|p| p.payslip_id == payslip_id) {
            warn!(payslip_id = payslip_id, "Loan deduction already applied");
            return Err(AppError::conflict(format!(
                "Loan deductions for payslip {} were already applied",
                payslip_id
            )));
        }
        Ok(())
    }

    /// Compute the next state of the given (freshly read, locked) loans.
    ///
    /// Works on the loans passed in by value and returns them mutated together
    /// with the new payment rows, so a failure on any line leaves the caller's
    /// state untouched.
    pub fn settle(
        mut loans: Vec<Loan>,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<(Vec<Loan>, Vec<LoanPayment>)> {
        let mut payments = Vec::with_capacity(deduction.lines.len());

        for line in &deduction.lines {
            let loan = loans
                .iter_mut()
                .find(|loan| loan.id == line.loan_id)
                .ok_or_else(|| AppError::not_found(format!("Loan '{}' not found", line.loan_id)))?;

            // The authoritative balance must still cover what the payslip shows
            if loan.deduction_due() < line.amount {
                return Err(AppError::conflict(format!(
                    "Loan {} balance changed: due {}, planned {}",
                    loan.id,
                    loan.deduction_due(),
                    line.amount
                )));
            }

            payments.push(loan.record_payment(line.amount, payslip_id, payment_date)?);
        }

        Ok((loans, payments))
    }
}
