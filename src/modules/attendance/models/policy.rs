use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Company attendance rules used by the payroll run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendancePolicy {
    /// Check-ins after this time count as late
    pub standard_check_in: NaiveTime,
    pub late_penalty_per_minute: Decimal,
    /// Monthly wage divisor for the overtime hourly rate (Kepmenakertrans 102/2004)
    pub overtime_hour_divisor: Decimal,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            standard_check_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            late_penalty_per_minute: Decimal::new(1_000, 0),
            overtime_hour_divisor: Decimal::new(173, 0),
        }
    }
}

impl AttendancePolicy {
    pub fn validate(&self) -> Result<()> {
        if self.late_penalty_per_minute < Decimal::ZERO {
            return Err(AppError::Configuration(
                "Late penalty per minute cannot be negative".to_string(),
            ));
        }
        if self.overtime_hour_divisor <= Decimal::ZERO {
            return Err(AppError::Configuration(
                "Overtime hour divisor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
