// Monthly payroll run.
//
// Computes one payslip per active employee from salary, attendance,
// statutory contributions, PPh 21 withholding, loan deductions and
// reimbursements, then persists the run as one unit of work. Employees fail
// independently; only period-level errors abort the run.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::attendance::{AttendanceCalculator, AttendanceRepository, OvertimeCalculator};
use crate::modules::contributions::{validate_wage, ContributionCalculator};
use crate::modules::employees::{Employee, EmployeeRepository};
use crate::modules::loans::LoanLedger;
use crate::modules::payroll::models::{
    BatchResult, EmployeeFailure, PayPeriod, PayrollSettings, Payslip, PayslipComputation,
    PayslipStatus, PeriodTotals,
};
use crate::modules::payroll::repositories::{PayrollBatch, PayrollRepository};
use crate::modules::withholding::{
    WithholdingCalculator, WithholdingInput, YearToDate, RECONCILIATION_MONTH,
};

/// Payroll run driver
pub struct PayslipOrchestrator {
    employees: Arc<dyn EmployeeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    loans: LoanLedger,
    payroll: Arc<dyn PayrollRepository>,
    contributions: Arc<dyn ContributionCalculator>,
    withholding: Arc<dyn WithholdingCalculator>,
    settings: PayrollSettings,
}

impl PayslipOrchestrator {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        loans: LoanLedger,
        payroll: Arc<dyn PayrollRepository>,
        contributions: Arc<dyn ContributionCalculator>,
        withholding: Arc<dyn WithholdingCalculator>,
        settings: PayrollSettings,
    ) -> Self {
        Self {
            employees,
            attendance,
            loans,
            payroll,
            contributions,
            withholding,
            settings,
        }
    }

    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Compute one employee's payslip without writing anything
    pub async fn compute_payslip(
        &self,
        employee: &Employee,
        period: &PayPeriod,
    ) -> Result<PayslipComputation> {
        let (start, end) = (period.start_date, period.end_date);
        let policy = &self.settings.attendance;

        let salary = self
            .employees
            .effective_salary(&employee.id, end)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "No salary effective on {} for employee {}",
                    end, employee.id
                ))
            })?;
        let base_salary = salary.base_salary;

        let records = self.attendance.attendance_records(&employee.id, start, end).await?;
        let attendance_days = AttendanceCalculator::attendance_days(&records, start, end);
        let business_days = AttendanceCalculator::count_business_days(start, end);

        // Mid-period joiners are paid for business days from their join date
        let is_prorated = employee.joined_within(start, end);
        let prorated_salary = if is_prorated {
            let worked = AttendanceCalculator::count_business_days(employee.join_date, end);
            AttendanceCalculator::prorate(base_salary, worked, business_days)
        } else {
            Decimal::ZERO
        };
        let earned_salary = if is_prorated { prorated_salary } else { base_salary };

        let components = self.employees.salary_components().await?;
        let allowance_total =
            AttendanceCalculator::attendance_allowance(&components, attendance_days);

        let late_minutes = AttendanceCalculator::late_minutes(&records, policy.standard_check_in);
        let late_penalty =
            AttendanceCalculator::late_penalty(late_minutes, policy.late_penalty_per_minute);

        let overtime_pay = if self.settings.overtime_enabled {
            let entries = self.attendance.overtime_entries(&employee.id, start, end).await?;
            let hourly = OvertimeCalculator::hourly_rate(base_salary, policy.overtime_hour_divisor);
            OvertimeCalculator::overtime_pay(&entries, hourly)
        } else {
            Decimal::ZERO
        };

        let gross_salary = earned_salary + allowance_total + overtime_pay;
        validate_wage(gross_salary)?;

        let contributions = self
            .contributions
            .calculate(gross_salary, employee.jkk_risk_class);

        let month = period.tax_month();
        let year_to_date = if month == RECONCILIATION_MONTH {
            let earlier = self
                .payroll
                .payslips_for_year(&employee.id, period.tax_year(), start)
                .await?;
            YearToDate::from_payslips(&earlier)
        } else {
            YearToDate::default()
        };

        let withholding = self.withholding.calculate(&WithholdingInput {
            gross_wage: gross_salary,
            ptkp_code: &employee.ptkp_code,
            month,
            employee_contributions: contributions.employee_total,
            year_to_date,
        });

        let loan_deduction = self.loans.compute_deduction(&employee.id).await?;
        let reimbursement_total = self
            .employees
            .payable_reimbursement_total(&employee.id)
            .await?;

        let total_deductions = contributions.employee_total
            + withholding.tax_amount
            + loan_deduction.total
            + late_penalty;
        let net_salary = gross_salary - total_deductions + reimbursement_total;

        debug!(
            employee_id = employee.id.as_str(),
            gross = %gross_salary,
            tax = %withholding.tax_amount,
            method = %withholding.method,
            net = %net_salary,
            "Payslip computed"
        );

        let now = chrono::Utc::now().naive_utc();
        let payslip = Payslip {
            id: Uuid::new_v4().to_string(),
            employee_id: employee.id.clone(),
            period_id: period.id.clone(),
            base_salary,
            prorated_salary,
            is_prorated,
            attendance_days: i32::try_from(attendance_days).unwrap_or(i32::MAX),
            business_days: i32::try_from(business_days).unwrap_or(i32::MAX),
            allowance_total,
            overtime_pay,
            gross_salary,
            contributions,
            tax_amount: withholding.tax_amount,
            tax_method: withholding.method,
            tax_category: withholding.category,
            ptkp_code: withholding.ptkp_code,
            loan_deduction: loan_deduction.total,
            late_penalty,
            late_minutes: i32::try_from(late_minutes).unwrap_or(i32::MAX),
            reimbursement_total,
            total_deductions,
            net_salary,
            status: PayslipStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        Ok(PayslipComputation {
            payslip,
            loan_deduction,
        })
    }

    /// Process every active employee for a period.
    ///
    /// # Errors
    /// * `NotFound` - unknown period
    /// * `Validation` - period already finalized
    /// * `Conflict` - period finalized before the totals write
    /// * any error from the totals write or the final commit; the whole run
    ///   is rolled back in that case
    pub async fn run_batch(&self, period_id: &str) -> Result<BatchResult> {
        let mut batch = self.payroll.begin_batch().await?;
        let mut period = batch
            .lock_period(period_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Pay period '{}' not found", period_id)))?;
        period.ensure_processable()?;

        let employees = self.employees.list_active().await?;
        let existing = batch.period_payslips(period_id).await?;
        let processed: HashSet<&str> = existing.iter().map(|p| p.employee_id.as_str()).collect();

        info!(
            period_id = period_id,
            employees = employees.len(),
            already_processed = processed.len(),
            "Payroll batch started"
        );

        let mut failures = Vec::new();
        let mut skipped = Vec::new();
        let mut success_count = 0;

        for employee in &employees {
            if processed.contains(employee.id.as_str()) {
                skipped.push(employee.id.clone());
                continue;
            }

            match self.process_employee(batch.as_mut(), employee, &period).await {
                Ok(()) => success_count += 1,
                Err(e) => {
                    warn!(
                        period_id = period_id,
                        employee_id = employee.id.as_str(),
                        error = %e,
                        "Payslip processing failed"
                    );
                    failures.push(EmployeeFailure {
                        employee_id: employee.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let totals = PeriodTotals::from_payslips(&batch.period_payslips(period_id).await?);
        period.apply_totals(&totals);
        batch.write_totals(&period).await?;
        batch.commit().await?;

        info!(
            period_id = period_id,
            success = success_count,
            failed = failures.len(),
            skipped = skipped.len(),
            total_net = %totals.total_net,
            "Payroll batch completed"
        );

        Ok(BatchResult {
            period_id: period.id,
            success_count,
            failed_count: failures.len(),
            failures,
            skipped,
            totals,
        })
    }

    async fn process_employee(
        &self,
        batch: &mut dyn PayrollBatch,
        employee: &Employee,
        period: &PayPeriod,
    ) -> Result<()> {
        let computation = self.compute_payslip(employee, period).await?;
        batch
            .commit_payslip(&computation, period.payment_date)
            .await
    }

    /// Close a processed period and its draft payslips
    pub async fn finalize_period(&self, period_id: &str) -> Result<PayPeriod> {
        let mut period = self.find_period(period_id).await?;
        period.finalize()?;
        self.payroll.finalize_period(&period).await?;

        info!(period_id = period_id, "Payroll period finalized");
        Ok(period)
    }

    pub async fn list_payslips(&self, period_id: &str) -> Result<Vec<Payslip>> {
        self.find_period(period_id).await?;
        self.payroll.payslips_for_period(period_id).await
    }

    /// Open a new draft period
    pub async fn create_period(
        &self,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        payment_date: NaiveDate,
    ) -> Result<PayPeriod> {
        let period = PayPeriod::new(name, start_date, end_date, payment_date)?;
        self.payroll.create_period(&period).await?;

        info!(
            period_id = period.id.as_str(),
            start = %period.start_date,
            end = %period.end_date,
            "Pay period created"
        );
        Ok(period)
    }

    pub async fn get_period(&self, period_id: &str) -> Result<PayPeriod> {
        self.find_period(period_id).await
    }

    async fn find_period(&self, period_id: &str) -> Result<PayPeriod> {
        self.payroll
            .find_period(period_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Pay period '{}' not found", period_id)))
    }
}
