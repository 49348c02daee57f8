use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only ledger row tying a loan deduction to the payslip that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LoanPayment {
    pub id: String,
    pub loan_id: String,
    pub payslip_id: String,
    /// 1-based sequence within the loan
    pub installment_number: i32,
    pub amount: Decimal,
    /// Balance after this payment
    pub remaining_balance: Decimal,
    pub payment_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl LoanPayment {
    pub fn new(
        loan_id: String,
        payslip_id: String,
        installment_number: i32,
        amount: Decimal,
        remaining_balance: Decimal,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            loan_id,
            payslip_id,
            installment_number,
            amount,
            remaining_balance,
            payment_date,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
