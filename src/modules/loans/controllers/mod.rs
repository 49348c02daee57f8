mod loan_controller;

pub use loan_controller::{configure, create_loan, get_loan, get_loan_payments};
