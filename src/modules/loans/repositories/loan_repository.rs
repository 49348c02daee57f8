use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{MySqlConnection, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::loans::models::{Loan, LoanDeduction, LoanPayment};
use crate::modules::loans::services::LoanLedger;

/// Persistence for loans and their payment ledger
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn create(&self, loan: &Loan) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>>;

    /// Active loans of an employee, oldest first
    async fn find_active_by_employee(&self, employee_id: &str) -> Result<Vec<Loan>>;

    /// Ledger rows of a loan ordered by installment number
    async fn payments_for_loan(&self, loan_id: &str) -> Result<Vec<LoanPayment>>;

    /// Apply a planned deduction in its own transaction
    async fn apply_deduction(
        &self,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<Vec<LoanPayment>>;
}

#[derive(Clone)]
pub struct MySqlLoanRepository {
    pool: MySqlPool,
}

const LOAN_COLUMNS: &str = r#"
    id, employee_id, principal, tenor_months, monthly_installment,
    remaining_balance, paid_installments, total_paid, status, start_date,
    created_at, updated_at
"#;

const PAYMENT_COLUMNS: &str = r#"
    id, loan_id, payslip_id, installment_number, amount, remaining_balance,
    payment_date, created_at
"#;

impl MySqlLoanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Apply a deduction on an open connection or transaction.
    ///
    /// Loan rows are re-read with `FOR UPDATE` so concurrent runs serialize on
    /// the balance. The caller owns commit and rollback; payroll runs this
    /// inside the per-employee savepoint.
    pub async fn apply_deduction_with_tx(
        conn: &mut MySqlConnection,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<Vec<LoanPayment>> {
        if deduction.is_empty() {
            return Ok(Vec::new());
        }

        let existing = sqlx::query_as::<_, LoanPayment>(&format!(
            "SELECT {} FROM loan_payments WHERE payslip_id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(payslip_id)
        .fetch_all(&mut *conn)
        .await?;
        LoanLedger::ensure_not_applied(&existing, payslip_id)?;

        let mut locked = Vec::with_capacity(deduction.lines.len());
        for line in &deduction.lines {
            let loan = sqlx::query_as::<_, Loan>(&format!(
                "SELECT {} FROM loans WHERE id = ? FOR UPDATE",
                LOAN_COLUMNS
            ))
            .bind(&line.loan_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Loan '{}' not found", line.loan_id)))?;
            locked.push(loan);
        }

        let (loans, payments) = LoanLedger::settle(locked, deduction, payslip_id, payment_date)?;

        for loan in &loans {
            sqlx::query(
                r#"
                UPDATE loans
                SET remaining_balance = ?, paid_installments = ?, total_paid = ?,
                    status = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(loan.remaining_balance)
            .bind(loan.paid_installments)
            .bind(loan.total_paid)
            .bind(loan.status.as_str())
            .bind(loan.updated_at)
            .bind(&loan.id)
            .execute(&mut *conn)
            .await?;
        }

        for payment in &payments {
            sqlx::query(
                r#"
                INSERT INTO loan_payments (
                    id, loan_id, payslip_id, installment_number, amount,
                    remaining_balance, payment_date, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&payment.id)
            .bind(&payment.loan_id)
            .bind(&payment.payslip_id)
            .bind(payment.installment_number)
            .bind(payment.amount)
            .bind(payment.remaining_balance)
            .bind(payment.payment_date)
            .bind(payment.created_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(payments)
    }
}

#[async_trait]
impl LoanRepository for MySqlLoanRepository {
    async fn create(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                id, employee_id, principal, tenor_months, monthly_installment,
                remaining_balance, paid_installments, total_paid, status,
                start_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&loan.id)
        .bind(&loan.employee_id)
        .bind(loan.principal)
        .bind(loan.tenor_months)
        .bind(loan.monthly_installment)
        .bind(loan.remaining_balance)
        .bind(loan.paid_installments)
        .bind(loan.total_paid)
        .bind(loan.status.as_str())
        .bind(loan.start_date)
        .bind(loan.created_at)
        .bind(loan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            "SELECT {} FROM loans WHERE id = ?",
            LOAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn find_active_by_employee(&self, employee_id: &str) -> Result<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(&format!(
            "SELECT {} FROM loans WHERE employee_id = ? AND status = 'active' \
             ORDER BY start_date ASC, created_at ASC",
            LOAN_COLUMNS
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    async fn payments_for_loan(&self, loan_id: &str) -> Result<Vec<LoanPayment>> {
        let payments = sqlx::query_as::<_, LoanPayment>(&format!(
            "SELECT {} FROM loan_payments WHERE loan_id = ? ORDER BY installment_number ASC",
            PAYMENT_COLUMNS
        ))
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    async fn apply_deduction(
        &self,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<Vec<LoanPayment>> {
        let mut tx = self.pool.begin().await?;

        let payments =
            Self::apply_deduction_with_tx(&mut tx, deduction, payslip_id, payment_date).await?;

        tx.commit().await?;
        Ok(payments)
    }
}
