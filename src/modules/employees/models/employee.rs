use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Employee as seen by the payroll core
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    /// Employment start date from the employee timeline
    pub join_date: NaiveDate,
    /// PTKP code such as `TK/0` or `K/2`
    pub ptkp_code: String,
    /// JKK work-accident risk class (1-5)
    pub jkk_risk_class: u8,
}

impl Employee {
    /// Whether the employee started working inside `[start, end]`
    pub fn joined_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.join_date >= start && self.join_date <= end
    }
}
