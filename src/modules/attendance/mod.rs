// Attendance module
//
// Attendance-driven pay: business-day counting, pro-ration for mid-period
// joiners, per-day allowances, late penalties and overtime pay.

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AttendancePolicy, AttendanceRecord, OvertimeEntry};
pub use repositories::{AttendanceRepository, MySqlAttendanceRepository};
pub use services::{AttendanceCalculator, OvertimeCalculator};
