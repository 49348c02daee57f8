use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::attendance::models::{AttendanceRecord, OvertimeEntry};

/// Read-only access to fingerprint and overtime records
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Attendance rows for an employee with `start <= date <= end`
    async fn attendance_records(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;

    /// Approved overtime for an employee with `start <= date <= end`
    async fn overtime_entries(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OvertimeEntry>>;
}

#[derive(Clone)]
pub struct MySqlAttendanceRepository {
    pool: MySqlPool,
}

impl MySqlAttendanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for MySqlAttendanceRepository {
    async fn attendance_records(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        // Earliest scan of the day is the check-in
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT employee_id, date, MIN(check_in) AS check_in
            FROM fingerprints
            WHERE employee_id = ? AND date BETWEEN ? AND ?
            GROUP BY employee_id, date
            ORDER BY date ASC
            "#,
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn overtime_entries(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OvertimeEntry>> {
        let entries = sqlx::query_as::<_, OvertimeEntry>(
            r#"
            SELECT employee_id, date, hours, is_holiday
            FROM overtime_entries
            WHERE employee_id = ? AND date BETWEEN ? AND ? AND status = 'approved'
            ORDER BY date ASC
            "#,
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
