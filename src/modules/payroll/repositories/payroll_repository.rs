// Persistence for pay periods and payslips.
//
// A batch run is one outer transaction. Each employee's payslip insert and
// loan-ledger update share a savepoint inside it, so one employee's failure
// rolls back only that employee while the totals write and final commit
// cover the whole run.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{Connection, MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::contributions::ContributionResult;
use crate::modules::loans::MySqlLoanRepository;
use crate::modules::payroll::models::{PayPeriod, Payslip, PayslipComputation, PayslipStatus};
use crate::modules::withholding::{PtkpCode, TerCategory};

#[async_trait]
pub trait PayrollRepository: Send + Sync {
    async fn create_period(&self, period: &PayPeriod) -> Result<()>;

    async fn find_period(&self, id: &str) -> Result<Option<PayPeriod>>;

    /// Payslips of a period ordered by employee
    async fn payslips_for_period(&self, period_id: &str) -> Result<Vec<Payslip>>;

    /// Payslips of an employee whose period ended in `year` before `before`
    async fn payslips_for_year(
        &self,
        employee_id: &str,
        year: i32,
        before: NaiveDate,
    ) -> Result<Vec<Payslip>>;

    /// Open the outer unit of work for a batch run
    async fn begin_batch(&self) -> Result<Box<dyn PayrollBatch>>;

    /// Persist a finalized period and move its draft payslips along
    async fn finalize_period(&self, period: &PayPeriod) -> Result<()>;
}

/// Writes of one batch run. Dropping without `commit` rolls everything back.
#[async_trait]
pub trait PayrollBatch: Send {
    /// Lock the period row until the run commits or rolls back
    async fn lock_period(&mut self, period_id: &str) -> Result<Option<PayPeriod>>;

    /// Payslips of the period as seen inside this run
    async fn period_payslips(&mut self, period_id: &str) -> Result<Vec<Payslip>>;

    /// Insert the payslip and apply its loan deduction atomically
    async fn commit_payslip(
        &mut self,
        computation: &PayslipComputation,
        payment_date: NaiveDate,
    ) -> Result<()>;

    /// Store the period totals and status. A finalized period is a `Conflict`.
    async fn write_totals(&mut self, period: &PayPeriod) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

#[derive(Clone)]
pub struct MySqlPayrollRepository {
    pool: MySqlPool,
}

impl MySqlPayrollRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const PERIOD_COLUMNS: &str = r#"
    id, name, start_date, end_date, payment_date, status, total_gross,
    total_net, total_employer_contributions, total_employee_contributions,
    total_tax, total_loan_deductions, employee_count, processed_at,
    created_at, updated_at
"#;

const PAYSLIP_COLUMNS: &str = r#"
    p.id, p.employee_id, p.period_id, p.base_salary, p.prorated_salary,
    p.is_prorated, p.attendance_days, p.business_days, p.allowance_total,
    p.overtime_pay, p.gross_salary, p.jht_employer, p.jht_employee,
    p.jkk_employer, p.jkm_employer, p.jp_employer, p.jp_employee,
    p.health_employer, p.health_employee, p.employer_contribution_total,
    p.employee_contribution_total, p.tax_amount, p.tax_method, p.tax_category,
    p.ptkp_code, p.loan_deduction, p.late_penalty, p.late_minutes,
    p.reimbursement_total, p.total_deductions, p.net_salary, p.status,
    p.created_at, p.updated_at
"#;

#[async_trait]
impl PayrollRepository for MySqlPayrollRepository {
    async fn create_period(&self, period: &PayPeriod) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pay_periods (
                id, name, start_date, end_date, payment_date, status,
                total_gross, total_net, total_employer_contributions,
                total_employee_contributions, total_tax, total_loan_deductions,
                employee_count, processed_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&period.id)
        .bind(&period.name)
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.payment_date)
        .bind(period.status.as_str())
        .bind(period.total_gross)
        .bind(period.total_net)
        .bind(period.total_employer_contributions)
        .bind(period.total_employee_contributions)
        .bind(period.total_tax)
        .bind(period.total_loan_deductions)
        .bind(period.employee_count)
        .bind(period.processed_at)
        .bind(period.created_at)
        .bind(period.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_period(&self, id: &str) -> Result<Option<PayPeriod>> {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            "SELECT {} FROM pay_periods WHERE id = ?",
            PERIOD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(period)
    }

    async fn payslips_for_period(&self, period_id: &str) -> Result<Vec<Payslip>> {
        let rows = sqlx::query_as::<_, PayslipRow>(&format!(
            "SELECT {} FROM payslips p WHERE p.period_id = ? ORDER BY p.employee_id ASC",
            PAYSLIP_COLUMNS
        ))
        .bind(period_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Payslip::try_from).collect()
    }

    async fn payslips_for_year(
        &self,
        employee_id: &str,
        year: i32,
        before: NaiveDate,
    ) -> Result<Vec<Payslip>> {
        let rows = sqlx::query_as::<_, PayslipRow>(&format!(
            r#"
            SELECT {}
            FROM payslips p
            JOIN pay_periods pp ON pp.id = p.period_id
            WHERE p.employee_id = ? AND YEAR(pp.end_date) = ? AND pp.end_date < ?
            ORDER BY pp.end_date ASC
            "#,
            PAYSLIP_COLUMNS
        ))
        .bind(employee_id)
        .bind(year)
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Payslip::try_from).collect()
    }

    async fn begin_batch(&self) -> Result<Box<dyn PayrollBatch>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlPayrollBatch { tx }))
    }

    async fn finalize_period(&self, period: &PayPeriod) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE pay_periods
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = 'processing'
            "#,
        )
        .bind(period.status.as_str())
        .bind(period.updated_at)
        .bind(&period.id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::conflict(format!(
                "Period {} changed state during finalization",
                period.id
            )));
        }

        sqlx::query(
            r#"
            UPDATE payslips
            SET status = ?, updated_at = ?
            WHERE period_id = ? AND status = ?
            "#,
        )
        .bind(PayslipStatus::Finalized.as_str())
        .bind(period.updated_at)
        .bind(&period.id)
        .bind(PayslipStatus::Draft.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Outer transaction of a batch run
pub struct MySqlPayrollBatch {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl PayrollBatch for MySqlPayrollBatch {
    async fn lock_period(&mut self, period_id: &str) -> Result<Option<PayPeriod>> {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            "SELECT {} FROM pay_periods WHERE id = ? FOR UPDATE",
            PERIOD_COLUMNS
        ))
        .bind(period_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(period)
    }

    async fn period_payslips(&mut self, period_id: &str) -> Result<Vec<Payslip>> {
        let rows = sqlx::query_as::<_, PayslipRow>(&format!(
            "SELECT {} FROM payslips p WHERE p.period_id = ? ORDER BY p.employee_id ASC",
            PAYSLIP_COLUMNS
        ))
        .bind(period_id)
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(Payslip::try_from).collect()
    }

    async fn commit_payslip(
        &mut self,
        computation: &PayslipComputation,
        payment_date: NaiveDate,
    ) -> Result<()> {
        // Savepoint; dropped on error, which rolls back to it
        let mut savepoint = Connection::begin(&mut *self.tx).await?;
        let payslip = &computation.payslip;
        let contributions = &payslip.contributions;

        sqlx::query(
            r#"
            INSERT INTO payslips (
                id, employee_id, period_id, base_salary, prorated_salary,
                is_prorated, attendance_days, business_days, allowance_total,
                overtime_pay, gross_salary, jht_employer, jht_employee,
                jkk_employer, jkm_employer, jp_employer, jp_employee,
                health_employer, health_employee, employer_contribution_total,
                employee_contribution_total, tax_amount, tax_method, tax_category,
                ptkp_code, loan_deduction, late_penalty, late_minutes,
                reimbursement_total, total_deductions, net_salary, status,
                created_at, updated_at
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            )
            "#,
        )
        .bind(&payslip.id)
        .bind(&payslip.employee_id)
        .bind(&payslip.period_id)
        .bind(payslip.base_salary)
        .bind(payslip.prorated_salary)
        .bind(payslip.is_prorated)
        .bind(payslip.attendance_days)
        .bind(payslip.business_days)
        .bind(payslip.allowance_total)
        .bind(payslip.overtime_pay)
        .bind(payslip.gross_salary)
        .bind(contributions.jht_employer)
        .bind(contributions.jht_employee)
        .bind(contributions.jkk_employer)
        .bind(contributions.jkm_employer)
        .bind(contributions.jp_employer)
        .bind(contributions.jp_employee)
        .bind(contributions.health_employer)
        .bind(contributions.health_employee)
        .bind(contributions.employer_total)
        .bind(contributions.employee_total)
        .bind(payslip.tax_amount)
        .bind(payslip.tax_method.as_str())
        .bind(payslip.tax_category.map(|c| c.to_string()))
        .bind(payslip.ptkp_code.as_str())
        .bind(payslip.loan_deduction)
        .bind(payslip.late_penalty)
        .bind(payslip.late_minutes)
        .bind(payslip.reimbursement_total)
        .bind(payslip.total_deductions)
        .bind(payslip.net_salary)
        .bind(payslip.status.as_str())
        .bind(payslip.created_at)
        .bind(payslip.updated_at)
        .execute(&mut *savepoint)
        .await?;

        MySqlLoanRepository::apply_deduction_with_tx(
            &mut savepoint,
            &computation.loan_deduction,
            &payslip.id,
            payment_date,
        )
        .await?;

        savepoint.commit().await?;
        Ok(())
    }

    async fn write_totals(&mut self, period: &PayPeriod) -> Result<()> {
        let updated = sqlx::query(
            r#"
            UPDATE pay_periods
            SET total_gross = ?, total_net = ?, total_employer_contributions = ?,
                total_employee_contributions = ?, total_tax = ?,
                total_loan_deductions = ?, employee_count = ?, status = ?,
                processed_at = ?, updated_at = ?
            WHERE id = ? AND status <> 'finalized'
            "#,
        )
        .bind(period.total_gross)
        .bind(period.total_net)
        .bind(period.total_employer_contributions)
        .bind(period.total_employee_contributions)
        .bind(period.total_tax)
        .bind(period.total_loan_deductions)
        .bind(period.employee_count)
        .bind(period.status.as_str())
        .bind(period.processed_at)
        .bind(period.updated_at)
        .bind(&period.id)
        .execute(&mut *self.tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::conflict(format!(
                "Period {} was finalized during processing",
                period.id
            )));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Database row representation for the payslips table
#[derive(sqlx::FromRow)]
struct PayslipRow {
    id: String,
    employee_id: String,
    period_id: String,
    base_salary: Decimal,
    prorated_salary: Decimal,
    is_prorated: bool,
    attendance_days: i32,
    business_days: i32,
    allowance_total: Decimal,
    overtime_pay: Decimal,
    gross_salary: Decimal,
    jht_employer: Decimal,
    jht_employee: Decimal,
    jkk_employer: Decimal,
    jkm_employer: Decimal,
    jp_employer: Decimal,
    jp_employee: Decimal,
    health_employer: Decimal,
    health_employee: Decimal,
    employer_contribution_total: Decimal,
    employee_contribution_total: Decimal,
    tax_amount: Decimal,
    tax_method: String,
    tax_category: Option<String>,
    ptkp_code: String,
    loan_deduction: Decimal,
    late_penalty: Decimal,
    late_minutes: i32,
    reimbursement_total: Decimal,
    total_deductions: Decimal,
    net_salary: Decimal,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<PayslipRow> for Payslip {
    type Error = AppError;

    fn try_from(row: PayslipRow) -> Result<Self> {
        let tax_category: Option<TerCategory> = row
            .tax_category
            .map(TerCategory::try_from)
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            period_id: row.period_id,
            base_salary: row.base_salary,
            prorated_salary: row.prorated_salary,
            is_prorated: row.is_prorated,
            attendance_days: row.attendance_days,
            business_days: row.business_days,
            allowance_total: row.allowance_total,
            overtime_pay: row.overtime_pay,
            gross_salary: row.gross_salary,
            contributions: ContributionResult {
                jht_employer: row.jht_employer,
                jht_employee: row.jht_employee,
                jkk_employer: row.jkk_employer,
                jkm_employer: row.jkm_employer,
                jp_employer: row.jp_employer,
                jp_employee: row.jp_employee,
                health_employer: row.health_employer,
                health_employee: row.health_employee,
                employer_total: row.employer_contribution_total,
                employee_total: row.employee_contribution_total,
            },
            tax_amount: row.tax_amount,
            tax_method: row.tax_method.try_into().map_err(AppError::Internal)?,
            tax_category,
            ptkp_code: PtkpCode::parse_or_default(&row.ptkp_code),
            loan_deduction: row.loan_deduction,
            late_penalty: row.late_penalty,
            late_minutes: row.late_minutes,
            reimbursement_total: row.reimbursement_total,
            total_deductions: row.total_deductions,
            net_salary: row.net_salary,
            status: row.status.try_into().map_err(AppError::Internal)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
