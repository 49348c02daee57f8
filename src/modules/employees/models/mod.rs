mod employee;
mod reimbursement;
mod salary;

pub use employee::Employee;
pub use reimbursement::{Reimbursement, ReimbursementStatus};
pub use salary::{resolve_effective_salary, EmployeeSalary, SalaryComponent};
