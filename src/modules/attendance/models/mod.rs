mod attendance_record;
mod policy;

pub use attendance_record::{AttendanceRecord, OvertimeEntry};
pub use policy::AttendancePolicy;
