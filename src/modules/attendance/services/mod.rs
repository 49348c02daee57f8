mod attendance_calculator;
mod overtime_calculator;

pub use attendance_calculator::AttendanceCalculator;
pub use overtime_calculator::OvertimeCalculator;
