pub mod attendance;
pub mod contributions;
pub mod employees;
pub mod health;
pub mod loans;
pub mod payroll;
pub mod thr;
pub mod withholding;
