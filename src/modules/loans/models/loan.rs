use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::loans::models::LoanPayment;

/// Employee loan repaid by fixed monthly payroll deductions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: String,
    pub employee_id: String,
    pub principal: Decimal,
    pub tenor_months: i32,
    /// Fixed deduction per period
    pub monthly_installment: Decimal,
    /// Always `principal - total_paid`
    pub remaining_balance: Decimal,
    pub paid_installments: i32,
    pub total_paid: Decimal,
    #[sqlx(try_from = "String")]
    pub status: LoanStatus,
    pub start_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Balance outstanding
    Active,
    /// Fully repaid
    Completed,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for LoanStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid loan status: {}", value)),
        }
    }
}

impl Loan {
    /// Originate a loan.
    ///
    /// The installment is `ceil(principal / tenor)` so the loan is repaid
    /// within its tenor; the final deduction is capped at the remaining balance.
    pub fn new(
        employee_id: String,
        principal: Decimal,
        tenor_months: i32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        if principal <= Decimal::ZERO {
            return Err(AppError::validation("Loan principal must be positive"));
        }

        // Balances are stored in whole Rupiah
        if !principal.fract().is_zero() {
            return Err(AppError::validation(format!(
                "Loan principal must be whole Rupiah, got {}",
                principal
            )));
        }

        if tenor_months < 1 {
            return Err(AppError::validation(format!(
                "Loan tenor must be at least 1 month, got {}",
                tenor_months
            )));
        }

        let monthly_installment = (principal / Decimal::from(tenor_months)).ceil();
        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            employee_id,
            principal,
            tenor_months,
            monthly_installment,
            remaining_balance: principal,
            paid_installments: 0,
            total_paid: Decimal::ZERO,
            status: LoanStatus::Active,
            start_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Amount to deduct this period: `min(installment, remaining)` for active loans
    pub fn deduction_due(&self) -> Decimal {
        if self.status != LoanStatus::Active || self.remaining_balance <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.monthly_installment.min(self.remaining_balance)
    }

    /// Apply one payroll deduction and produce its ledger row
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<LoanPayment> {
        if self.status == LoanStatus::Completed {
            return Err(AppError::conflict(format!(
                "Loan {} is already completed",
                self.id
            )));
        }

        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Loan payment amount must be positive"));
        }

        let applied = amount.min(self.remaining_balance);
        self.remaining_balance = (self.remaining_balance - applied).max(Decimal::ZERO);
        self.total_paid += applied;
        self.paid_installments += 1;
        if self.remaining_balance.is_zero() {
            self.status = LoanStatus::Completed;
        }
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(LoanPayment::new(
            self.id.clone(),
            payslip_id.to_string(),
            self.paid_installments,
            applied,
            self.remaining_balance,
            payment_date,
        ))
    }

    /// Installments still expected at the fixed amount
    pub fn remaining_installments(&self) -> i32 {
        if self.status == LoanStatus::Completed || self.monthly_installment.is_zero() {
            return 0;
        }
        (self.remaining_balance / self.monthly_installment)
            .ceil()
            .to_i32()
            .unwrap_or(i32::MAX)
    }
}

/// Loan with its ledger, for display layers
#[derive(Debug, Clone, Serialize)]
pub struct LoanSchedule {
    pub loan: Loan,
    pub payments: Vec<LoanPayment>,
    pub remaining_installments: i32,
}

/// One loan's share of a period deduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDeductionLine {
    pub loan_id: String,
    pub amount: Decimal,
}

/// Deduction planned for one employee in one period
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoanDeduction {
    pub employee_id: String,
    pub total: Decimal,
    pub lines: Vec<LoanDeductionLine>,
}

impl LoanDeduction {
    /// Plan deductions from the employee's loans; inactive or settled loans are skipped
    pub fn from_loans(employee_id: &str, loans: &[Loan]) -> Self {
        let lines: Vec<LoanDeductionLine> = loans
            .iter()
            .filter(|loan| loan.employee_id == employee_id)
            .filter_map(|loan| {
                let amount = loan.deduction_due();
                (amount > Decimal::ZERO).then(|| LoanDeductionLine {
                    loan_id: loan.id.clone(),
                    amount,
                })
            })
            .collect();

        Self {
            employee_id: employee_id.to_string(),
            total: lines.iter().map(|line| line.amount).sum(),
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
