// Read-only access to the HR tables the payroll core depends on.
//
// The payroll engine never writes these tables; they are owned by the HR
// subsystem. Everything here is a plain SELECT.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::employees::models::{Employee, EmployeeSalary, SalaryComponent};

/// Source of employee master data for payroll runs
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// All employees flagged active, ordered by id
    async fn list_active(&self) -> Result<Vec<Employee>>;

    /// Find a single employee by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>>;

    /// Salary row effective on `date` (latest start on or before the date
    /// with an open or later end date)
    async fn effective_salary(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<EmployeeSalary>>;

    /// All configured salary components; callers filter by flags
    async fn salary_components(&self) -> Result<Vec<SalaryComponent>>;

    /// Sum of approved reimbursements not yet paid out
    async fn payable_reimbursement_total(&self, employee_id: &str) -> Result<Decimal>;
}

/// MySQL-backed employee repository
#[derive(Clone)]
pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn list_active(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, is_active, join_date, ptkp_code, jkk_risk_class
            FROM employees
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, is_active, join_date, ptkp_code, jkk_risk_class
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn effective_salary(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<EmployeeSalary>> {
        let salary = sqlx::query_as::<_, EmployeeSalary>(
            r#"
            SELECT id, employee_id, base_salary, effective_from, effective_until
            FROM employee_salaries
            WHERE employee_id = ?
              AND effective_from <= ?
              AND (effective_until IS NULL OR effective_until >= ?)
            ORDER BY effective_from DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(salary)
    }

    async fn salary_components(&self) -> Result<Vec<SalaryComponent>> {
        let components = sqlx::query_as::<_, SalaryComponent>(
            r#"
            SELECT id, name, amount, is_active, is_attendance_based
            FROM salary_components
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(components)
    }

    async fn payable_reimbursement_total(&self, employee_id: &str) -> Result<Decimal> {
        let total: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount)
            FROM reimbursements
            WHERE employee_id = ? AND status = 'approved' AND paid_at IS NULL
            "#,
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }
}
