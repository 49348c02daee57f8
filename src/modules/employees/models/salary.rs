use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Effective-dated base salary row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeSalary {
    pub id: String,
    pub employee_id: String,
    pub base_salary: Decimal,
    pub effective_from: NaiveDate,
    /// Open-ended when `None`
    pub effective_until: Option<NaiveDate>,
}

impl EmployeeSalary {
    /// A row applies on `date` when it started on or before it and has not ended before it
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_until.map_or(true, |until| until >= date)
    }
}

/// Picks the salary effective on `date`: the latest `effective_from <= date`
/// whose end date is open or not before `date`.
pub fn resolve_effective_salary(
    salaries: &[EmployeeSalary],
    date: NaiveDate,
) -> Option<&EmployeeSalary> {
    salaries
        .iter()
        .filter(|s| s.is_effective_on(date))
        .max_by_key(|s| s.effective_from)
}

/// Configured allowance definition
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalaryComponent {
    pub id: String,
    pub name: String,
    /// Per-day amount when attendance based, monthly amount otherwise
    pub amount: Decimal,
    pub is_active: bool,
    pub is_attendance_based: bool,
}
