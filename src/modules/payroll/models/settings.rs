use serde::{Deserialize, Serialize};

use crate::modules::attendance::AttendancePolicy;

/// Company-level switches for payroll runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// Pay approved overtime; off keeps overtime at 0
    pub overtime_enabled: bool,
    pub attendance: AttendancePolicy,
}
