// Employees module
//
// Read-only view of the HR records the payroll core consumes: employees and
// their employment timeline, effective-dated salaries, salary components and
// approved reimbursements.

pub mod models;
pub mod repositories;

pub use models::{Employee, EmployeeSalary, Reimbursement, ReimbursementStatus, SalaryComponent};
pub use repositories::{EmployeeRepository, MySqlEmployeeRepository};
