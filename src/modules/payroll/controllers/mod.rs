mod payroll_controller;

pub use payroll_controller::{
    configure, create_period, finalize_period, get_period, list_payslips, process_period,
};
