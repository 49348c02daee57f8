// In-memory repository implementations.
//
// Payroll and loan state live in one shared `StoreState` so a batch can
// snapshot both, work on the copy, and swap it in on commit. Dropping a
// batch without committing discards the copy, which mirrors a rolled back
// MySQL transaction.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use gajian::core::{AppError, Result};
use gajian::modules::attendance::{AttendanceRecord, AttendanceRepository, OvertimeEntry};
use gajian::modules::employees::models::resolve_effective_salary;
use gajian::modules::employees::{
    Employee, EmployeeRepository, EmployeeSalary, Reimbursement, SalaryComponent,
};
use gajian::modules::loans::{
    Loan, LoanDeduction, LoanLedger, LoanPayment, LoanRepository, LoanStatus,
};
use gajian::modules::payroll::{
    PayPeriod, PayrollBatch, PayrollRepository, Payslip, PayslipComputation, PayslipStatus,
    PeriodStatus,
};

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    pub employees: Mutex<Vec<Employee>>,
    pub salaries: Mutex<Vec<EmployeeSalary>>,
    pub components: Mutex<Vec<SalaryComponent>>,
    pub reimbursements: Mutex<Vec<Reimbursement>>,
}

impl InMemoryEmployeeRepository {
    pub fn add_employee(&self, employee: Employee) {
        self.employees.lock().unwrap().push(employee);
    }

    pub fn add_salary(&self, salary: EmployeeSalary) {
        self.salaries.lock().unwrap().push(salary);
    }

    pub fn add_component(&self, component: SalaryComponent) {
        self.components.lock().unwrap().push(component);
    }

    pub fn add_reimbursement(&self, reimbursement: Reimbursement) {
        self.reimbursements.lock().unwrap().push(reimbursement);
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list_active(&self) -> Result<Vec<Employee>> {
        let mut active: Vec<Employee> = self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn effective_salary(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<EmployeeSalary>> {
        let salaries: Vec<EmployeeSalary> = self
            .salaries
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.employee_id == employee_id)
            .cloned()
            .collect();
        Ok(resolve_effective_salary(&salaries, date).cloned())
    }

    async fn salary_components(&self) -> Result<Vec<SalaryComponent>> {
        Ok(self.components.lock().unwrap().clone())
    }

    async fn payable_reimbursement_total(&self, employee_id: &str) -> Result<Decimal> {
        Ok(self
            .reimbursements
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.employee_id == employee_id && r.is_payable())
            .map(|r| r.amount)
            .sum())
    }
}

#[derive(Default)]
pub struct InMemoryAttendanceRepository {
    pub records: Mutex<Vec<AttendanceRecord>>,
    pub overtime: Mutex<Vec<OvertimeEntry>>,
}

impl InMemoryAttendanceRepository {
    pub fn add_record(&self, record: AttendanceRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn add_overtime(&self, entry: OvertimeEntry) {
        self.overtime.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn attendance_records(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }

    async fn overtime_entries(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OvertimeEntry>> {
        Ok(self
            .overtime
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.employee_id == employee_id && e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }
}

/// Payroll and loan tables
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub periods: Vec<PayPeriod>,
    pub payslips: Vec<Payslip>,
    pub loans: Vec<Loan>,
    pub loan_payments: Vec<LoanPayment>,
    /// Make the next totals write fail
    pub fail_totals_write: bool,
}

impl StoreState {
    /// Same steps as the MySQL path: guard, re-read, settle, write
    fn apply_deduction(
        &mut self,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<Vec<LoanPayment>> {
        if deduction.is_empty() {
            return Ok(Vec::new());
        }

        LoanLedger::ensure_not_applied(&self.loan_payments, payslip_id)?;

        let current = deduction
            .lines
            .iter()
            .map(|line| {
                self.loans
                    .iter()
                    .find(|loan| loan.id == line.loan_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::not_found(format!("Loan '{}' not found", line.loan_id))
                    })
            })
            .collect::<Result<Vec<Loan>>>()?;

        let (loans, payments) = LoanLedger::settle(current, deduction, payslip_id, payment_date)?;

        for loan in loans {
            if let Some(stored) = self.loans.iter_mut().find(|l| l.id == loan.id) {
                *stored = loan;
            }
        }
        self.loan_payments.extend(payments.iter().cloned());

        Ok(payments)
    }
}

/// Shared handle over `StoreState`
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    pub fn add_period(&self, period: PayPeriod) {
        self.state.lock().unwrap().periods.push(period);
    }

    pub fn add_loan(&self, loan: Loan) {
        self.state.lock().unwrap().loans.push(loan);
    }

    pub fn loan(&self, id: &str) -> Option<Loan> {
        self.state
            .lock()
            .unwrap()
            .loans
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }

    pub fn period(&self, id: &str) -> Option<PayPeriod> {
        self.state
            .lock()
            .unwrap()
            .periods
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn fail_next_totals_write(&self) {
        self.state.lock().unwrap().fail_totals_write = true;
    }
}

#[derive(Clone)]
pub struct InMemoryLoanRepository {
    store: InMemoryStore,
}

impl InMemoryLoanRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn create(&self, loan: &Loan) -> Result<()> {
        self.store.add_loan(loan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>> {
        Ok(self.store.loan(id))
    }

    async fn find_active_by_employee(&self, employee_id: &str) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .store
            .state
            .lock()
            .unwrap()
            .loans
            .iter()
            .filter(|l| l.employee_id == employee_id && l.status == LoanStatus::Active)
            .cloned()
            .collect();
        loans.sort_by_key(|l| (l.start_date, l.created_at));
        Ok(loans)
    }

    async fn payments_for_loan(&self, loan_id: &str) -> Result<Vec<LoanPayment>> {
        let mut payments: Vec<LoanPayment> = self
            .store
            .state
            .lock()
            .unwrap()
            .loan_payments
            .iter()
            .filter(|p| p.loan_id == loan_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.installment_number);
        Ok(payments)
    }

    async fn apply_deduction(
        &self,
        deduction: &LoanDeduction,
        payslip_id: &str,
        payment_date: NaiveDate,
    ) -> Result<Vec<LoanPayment>> {
        // Work on a copy so a failed line leaves the store untouched
        let mut working = self.store.snapshot();
        let payments = working.apply_deduction(deduction, payslip_id, payment_date)?;
        *self.store.state.lock().unwrap() = working;
        Ok(payments)
    }
}

#[derive(Clone)]
pub struct InMemoryPayrollRepository {
    store: InMemoryStore,
}

impl InMemoryPayrollRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PayrollRepository for InMemoryPayrollRepository {
    async fn create_period(&self, period: &PayPeriod) -> Result<()> {
        self.store.add_period(period.clone());
        Ok(())
    }

    async fn find_period(&self, id: &str) -> Result<Option<PayPeriod>> {
        Ok(self.store.period(id))
    }

    async fn payslips_for_period(&self, period_id: &str) -> Result<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .store
            .state
            .lock()
            .unwrap()
            .payslips
            .iter()
            .filter(|p| p.period_id == period_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(payslips)
    }

    async fn payslips_for_year(
        &self,
        employee_id: &str,
        year: i32,
        before: NaiveDate,
    ) -> Result<Vec<Payslip>> {
        let state = self.store.state.lock().unwrap();
        Ok(state
            .payslips
            .iter()
            .filter(|p| p.employee_id == employee_id)
            .filter(|p| {
                state.periods.iter().any(|period| {
                    period.id == p.period_id
                        && period.tax_year() == year
                        && period.end_date < before
                })
            })
            .cloned()
            .collect())
    }

    async fn begin_batch(&self) -> Result<Box<dyn PayrollBatch>> {
        Ok(Box::new(InMemoryBatch {
            store: self.store.clone(),
            working: self.store.snapshot(),
        }))
    }

    async fn finalize_period(&self, period: &PayPeriod) -> Result<()> {
        let mut state = self.store.state.lock().unwrap();
        if let Some(stored) = state.periods.iter_mut().find(|p| p.id == period.id) {
            *stored = period.clone();
        }
        for payslip in state.payslips.iter_mut().filter(|p| p.period_id == period.id) {
            if payslip.status == PayslipStatus::Draft {
                payslip.status = PayslipStatus::Finalized;
                payslip.updated_at = period.updated_at;
            }
        }
        Ok(())
    }
}

/// Copy of the store that becomes visible on commit
pub struct InMemoryBatch {
    store: InMemoryStore,
    working: StoreState,
}

#[async_trait]
impl PayrollBatch for InMemoryBatch {
    async fn lock_period(&mut self, period_id: &str) -> Result<Option<PayPeriod>> {
        Ok(self.working.periods.iter().find(|p| p.id == period_id).cloned())
    }

    async fn period_payslips(&mut self, period_id: &str) -> Result<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .working
            .payslips
            .iter()
            .filter(|p| p.period_id == period_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(payslips)
    }

    async fn commit_payslip(
        &mut self,
        computation: &PayslipComputation,
        payment_date: NaiveDate,
    ) -> Result<()> {
        let payslip = &computation.payslip;

        // Unique (employee, period)
        if self
            .working
            .payslips
            .iter()
            .any(|p| p.employee_id == payslip.employee_id && p.period_id == payslip.period_id)
        {
            return Err(AppError::conflict(format!(
                "Payslip for employee {} in period {} already exists",
                payslip.employee_id, payslip.period_id
            )));
        }

        // Savepoint: apply on a copy, keep it only if every step succeeds
        let mut savepoint = self.working.clone();
        savepoint.apply_deduction(&computation.loan_deduction, &payslip.id, payment_date)?;
        savepoint.payslips.push(payslip.clone());
        self.working = savepoint;

        Ok(())
    }

    async fn write_totals(&mut self, period: &PayPeriod) -> Result<()> {
        if self.working.fail_totals_write {
            self.working.fail_totals_write = false;
            return Err(AppError::internal("Simulated totals write failure"));
        }

        // The committed store may have moved on since the snapshot
        let finalized = |periods: &[PayPeriod]| {
            periods
                .iter()
                .any(|p| p.id == period.id && p.status == PeriodStatus::Finalized)
        };
        let committed = self.store.snapshot();
        if finalized(&self.working.periods) || finalized(&committed.periods) {
            return Err(AppError::conflict(format!(
                "Period {} was finalized during processing",
                period.id
            )));
        }

        match self.working.periods.iter_mut().find(|p| p.id == period.id) {
            Some(stored) => {
                *stored = period.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("Pay period '{}' not found", period.id))),
        }
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryBatch { store, working } = *self;
        *store.state.lock().unwrap() = working;
        Ok(())
    }
}
