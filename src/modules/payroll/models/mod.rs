mod batch;
mod pay_period;
mod payslip;
mod settings;

pub use batch::{BatchResult, EmployeeFailure, PayslipComputation};
pub use pay_period::{PayPeriod, PeriodStatus, PeriodTotals};
pub use payslip::{Payslip, PayslipStatus};
pub use settings::PayrollSettings;
