use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One fingerprint/attendance row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    /// Missing when the device only captured a check-out
    pub check_in: Option<NaiveTime>,
}

/// Approved overtime worked on one day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OvertimeEntry {
    pub employee_id: String,
    pub date: NaiveDate,
    pub hours: Decimal,
    /// Rest day or public holiday
    pub is_holiday: bool,
}
