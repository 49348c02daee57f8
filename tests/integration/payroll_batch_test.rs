// Integration tests for batch payroll runs: per-employee isolation, re-runs,
// loan deductions, finalization and rollback of the whole run.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use gajian::core::{AppError, Result};
use gajian::modules::loans::LoanStatus;
use gajian::modules::payroll::{
    PayPeriod, PayrollBatch, PayrollRepository, PayrollSettings, Payslip, PayslipStatus,
    PeriodStatus,
};
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Two payable employees and one without a salary row
fn three_employees(env: &TestPayroll) {
    env.hire("emp-a", date(2024, 1, 1), dec!(10000000));
    env.hire("emp-b", date(2024, 1, 1), dec!(10000000));
    env.employees
        .add_employee(TestDataFactory::employee("emp-c", date(2024, 1, 1)));
}

#[tokio::test]
async fn test_one_failure_does_not_stop_the_batch() -> Result<()> {
    let env = TestPayroll::new();
    three_employees(&env);
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);

    let result = env.orchestrator().run_batch(&period.id).await?;

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.failures[0].employee_id, "emp-c");
    assert!(result.skipped.is_empty());
    assert_eq!(result.totals.employee_count, 2);
    assert_eq!(result.totals.total_gross, dec!(20000000));
    assert_eq!(result.totals.total_net, dec!(18800000));
    assert_eq!(result.totals.total_tax, dec!(400000));
    assert_eq!(result.totals.total_employer_contributions, dec!(2048000));

    let stored = env.store.period(&period.id).expect("period stored");
    assert_eq!(stored.status, PeriodStatus::Processing);
    assert_eq!(stored.employee_count, 2);
    assert_eq!(stored.total_net, dec!(18800000));
    assert!(stored.processed_at.is_some());

    let payslips = env.orchestrator().list_payslips(&period.id).await?;
    assert_eq!(payslips.len(), 2);
    assert!(payslips.iter().all(|p| p.is_balanced()));

    Ok(())
}

#[tokio::test]
async fn test_rerun_skips_processed_employees() -> Result<()> {
    let env = TestPayroll::new();
    three_employees(&env);
    let period = TestDataFactory::monthly_period(2025, 2);
    env.add_period(&period);
    let orchestrator = env.orchestrator();

    orchestrator.run_batch(&period.id).await?;

    // Fix the missing salary and run again
    env.employees
        .add_salary(TestDataFactory::salary("emp-c", dec!(8000000), date(2024, 1, 1)));
    let result = orchestrator.run_batch(&period.id).await?;

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 0);
    assert_eq!(result.skipped, vec!["emp-a".to_string(), "emp-b".to_string()]);
    // Totals cover the whole period, not just this run
    assert_eq!(result.totals.employee_count, 3);
    assert_eq!(result.totals.total_gross, dec!(28000000));

    let payslips = orchestrator.list_payslips(&period.id).await?;
    assert_eq!(payslips.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_inactive_employees_are_not_processed() -> Result<()> {
    let env = TestPayroll::new();
    env.hire("emp-a", date(2024, 1, 1), dec!(10000000));
    let mut leaver = TestDataFactory::employee("emp-gone", date(2023, 1, 1));
    leaver.is_active = false;
    env.employees.add_employee(leaver);
    env.employees
        .add_salary(TestDataFactory::salary("emp-gone", dec!(9000000), date(2023, 1, 1)));
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);

    let result = env.orchestrator().run_batch(&period.id).await?;

    assert_eq!(result.success_count, 1);
    assert_eq!(result.totals.employee_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_loan_installment_deducted_once() -> Result<()> {
    let env = TestPayroll::new();
    env.hire("emp-a", date(2024, 1, 1), dec!(10000000));
    let loan = env
        .loans
        .originate("emp-a".to_string(), dec!(1200000), 12, date(2025, 1, 1))
        .await?;
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);
    let orchestrator = env.orchestrator();

    let result = orchestrator.run_batch(&period.id).await?;
    assert_eq!(result.totals.total_loan_deductions, dec!(100000));

    let payslip = orchestrator.list_payslips(&period.id).await?.remove(0);
    assert_eq!(payslip.loan_deduction, dec!(100000));
    assert_eq!(payslip.net_salary, dec!(9300000));

    let stored = env.store.loan(&loan.id).expect("loan stored");
    assert_eq!(stored.remaining_balance, dec!(1100000));
    assert_eq!(stored.paid_installments, 1);

    let payments = env.loans.payments(&loan.id).await?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].payslip_id, payslip.id);
    assert_eq!(payments[0].payment_date, period.payment_date);

    // A re-run skips the employee and leaves the loan alone
    orchestrator.run_batch(&period.id).await?;
    let stored = env.store.loan(&loan.id).expect("loan stored");
    assert_eq!(stored.remaining_balance, dec!(1100000));

    Ok(())
}

#[tokio::test]
async fn test_final_installment_completes_loan() -> Result<()> {
    let env = TestPayroll::new();
    env.hire("emp-a", date(2024, 1, 1), dec!(10000000));
    // ceil(1,000,000 / 3) = 333,334; last deduction is the 333,332 remainder
    let loan = env
        .loans
        .originate("emp-a".to_string(), dec!(1000000), 3, date(2025, 1, 1))
        .await?;
    let orchestrator = env.orchestrator();

    for month in 1..=4 {
        let period = TestDataFactory::monthly_period(2025, month);
        env.add_period(&period);
        orchestrator.run_batch(&period.id).await?;
    }

    let stored = env.store.loan(&loan.id).expect("loan stored");
    assert_eq!(stored.status, LoanStatus::Completed);
    assert_eq!(stored.remaining_balance, Decimal::ZERO);
    assert_eq!(stored.total_paid, dec!(1000000));

    let payments = env.loans.payments(&loan.id).await?;
    let amounts: Vec<Decimal> = payments.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![dec!(333334), dec!(333334), dec!(333332)]);

    Ok(())
}

#[tokio::test]
async fn test_totals_failure_rolls_back_the_run() -> Result<()> {
    let env = TestPayroll::new();
    env.hire("emp-a", date(2024, 1, 1), dec!(10000000));
    let loan = env
        .loans
        .originate("emp-a".to_string(), dec!(1200000), 12, date(2025, 1, 1))
        .await?;
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);
    env.store.fail_next_totals_write();

    let result = env.orchestrator().run_batch(&period.id).await;
    assert!(matches!(result, Err(AppError::Internal(_))));

    let state = env.store.snapshot();
    assert!(state.payslips.is_empty());
    assert!(state.loan_payments.is_empty());
    let stored = env.store.loan(&loan.id).expect("loan stored");
    assert_eq!(stored.remaining_balance, dec!(1200000));
    let stored = env.store.period(&period.id).expect("period stored");
    assert_eq!(stored.status, PeriodStatus::Draft);
    assert_eq!(stored.employee_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_finalize_closes_period_and_payslips() -> Result<()> {
    let env = TestPayroll::new();
    three_employees(&env);
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);
    let orchestrator = env.orchestrator();
    orchestrator.run_batch(&period.id).await?;

    let finalized = orchestrator.finalize_period(&period.id).await?;
    assert_eq!(finalized.status, PeriodStatus::Finalized);

    let payslips = orchestrator.list_payslips(&period.id).await?;
    assert!(payslips.iter().all(|p| p.status == PayslipStatus::Finalized));

    // No further runs once finalized
    let rerun = orchestrator.run_batch(&period.id).await;
    assert!(matches!(rerun, Err(AppError::Validation(_))));

    let again = orchestrator.finalize_period(&period.id).await;
    assert!(matches!(again, Err(AppError::Validation(_))));

    Ok(())
}

/// When a finalize request lands relative to the opening of a run
#[derive(Clone, Copy)]
enum FinalizeTiming {
    BeforeRunOpens,
    AfterRunOpens,
}

/// Finalizes a period through the committed store whenever a run opens
struct FinalizingPayrollRepository {
    inner: InMemoryPayrollRepository,
    period_id: String,
    timing: FinalizeTiming,
}

impl FinalizingPayrollRepository {
    async fn finalize_now(&self) -> Result<()> {
        let mut period = self
            .inner
            .find_period(&self.period_id)
            .await?
            .ok_or_else(|| AppError::not_found("period"))?;
        period.finalize()?;
        self.inner.finalize_period(&period).await
    }
}

#[async_trait]
impl PayrollRepository for FinalizingPayrollRepository {
    async fn create_period(&self, period: &PayPeriod) -> Result<()> {
        self.inner.create_period(period).await
    }

    async fn find_period(&self, id: &str) -> Result<Option<PayPeriod>> {
        self.inner.find_period(id).await
    }

    async fn payslips_for_period(&self, period_id: &str) -> Result<Vec<Payslip>> {
        self.inner.payslips_for_period(period_id).await
    }

    async fn payslips_for_year(
        &self,
        employee_id: &str,
        year: i32,
        before: NaiveDate,
    ) -> Result<Vec<Payslip>> {
        self.inner.payslips_for_year(employee_id, year, before).await
    }

    async fn begin_batch(&self) -> Result<Box<dyn PayrollBatch>> {
        match self.timing {
            FinalizeTiming::BeforeRunOpens => {
                self.finalize_now().await?;
                self.inner.begin_batch().await
            }
            FinalizeTiming::AfterRunOpens => {
                let batch = self.inner.begin_batch().await?;
                self.finalize_now().await?;
                Ok(batch)
            }
        }
    }

    async fn finalize_period(&self, period: &PayPeriod) -> Result<()> {
        self.inner.finalize_period(period).await
    }
}

/// Processes a period once, hires someone new, then runs again while a
/// finalize request races the second run
async fn rerun_while_finalizing(timing: FinalizeTiming) -> (TestPayroll, PayPeriod, Result<()>) {
    let env = TestPayroll::new();
    env.hire("emp-a", date(2024, 1, 1), dec!(10000000));
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);
    env.orchestrator()
        .run_batch(&period.id)
        .await
        .expect("first run");

    env.hire("emp-late", date(2024, 6, 1), dec!(8000000));
    let racing = FinalizingPayrollRepository {
        inner: InMemoryPayrollRepository::new(env.store.clone()),
        period_id: period.id.clone(),
        timing,
    };
    let result = env
        .orchestrator_over(Arc::new(racing), PayrollSettings::default())
        .run_batch(&period.id)
        .await
        .map(|_| ());

    (env, period, result)
}

fn assert_period_stays_finalized(env: &TestPayroll, period: &PayPeriod) {
    let stored = env.store.period(&period.id).expect("period stored");
    assert_eq!(stored.status, PeriodStatus::Finalized);
    assert_eq!(stored.employee_count, 1);
    assert_eq!(stored.total_gross, dec!(10000000));

    let payslips: Vec<(String, PayslipStatus)> = env
        .store
        .snapshot()
        .payslips
        .iter()
        .map(|p| (p.employee_id.clone(), p.status))
        .collect();
    assert_eq!(payslips, vec![("emp-a".to_string(), PayslipStatus::Finalized)]);
}

#[tokio::test]
async fn test_run_sees_finalize_committed_before_it_opens() {
    let (env, period, result) = rerun_while_finalizing(FinalizeTiming::BeforeRunOpens).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_period_stays_finalized(&env, &period);
}

#[tokio::test]
async fn test_totals_write_rejects_period_finalized_mid_run() {
    let (env, period, result) = rerun_while_finalizing(FinalizeTiming::AfterRunOpens).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_period_stays_finalized(&env, &period);
}

#[tokio::test]
async fn test_draft_period_cannot_be_finalized() {
    let env = TestPayroll::new();
    let period = TestDataFactory::monthly_period(2025, 1);
    env.add_period(&period);

    let result = env.orchestrator().finalize_period(&period.id).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_unknown_period_is_not_found() {
    let env = TestPayroll::new();
    let orchestrator = env.orchestrator();

    assert!(matches!(
        orchestrator.run_batch("missing").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        orchestrator.list_payslips("missing").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        orchestrator.finalize_period("missing").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_create_and_get_period() -> Result<()> {
    let env = TestPayroll::new();
    let orchestrator = env.orchestrator();

    let period = orchestrator
        .create_period(
            "April 2025".to_string(),
            date(2025, 4, 1),
            date(2025, 4, 30),
            date(2025, 4, 25),
        )
        .await?;
    assert_eq!(period.status, PeriodStatus::Draft);

    let fetched = orchestrator.get_period(&period.id).await?;
    assert_eq!(fetched, period);

    let inverted = orchestrator
        .create_period(
            "Broken".to_string(),
            date(2025, 4, 30),
            date(2025, 4, 1),
            date(2025, 4, 25),
        )
        .await;
    assert!(matches!(inverted, Err(AppError::Validation(_))));

    Ok(())
}
