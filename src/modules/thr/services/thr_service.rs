use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::employees::{Employee, EmployeeRepository};
use crate::modules::thr::models::{ThrBatchResult, ThrFailure, ThrResult, ThrSummary};
use crate::modules::thr::services::ThrCalculator;

/// Runs THR over the workforce
#[derive(Clone)]
pub struct ThrService {
    employees: Arc<dyn EmployeeRepository>,
}

impl ThrService {
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    /// THR for one employee; base is the salary effective on the reference date
    pub async fn calculate_for(
        &self,
        employee: &Employee,
        reference_date: NaiveDate,
    ) -> Result<ThrResult> {
        let salary = self
            .employees
            .effective_salary(&employee.id, reference_date)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "No salary effective on {} for employee {}",
                    reference_date, employee.id
                ))
            })?;

        Ok(ThrCalculator::calculate(
            &employee.id,
            employee.join_date,
            reference_date,
            salary.base_salary,
        ))
    }

    /// THR for the listed employees, or every active employee when `None`.
    ///
    /// Per-employee errors are collected in `failures`; the batch continues.
    pub async fn calculate_batch(
        &self,
        reference_date: NaiveDate,
        employee_ids: Option<Vec<String>>,
    ) -> Result<ThrBatchResult> {
        let mut results = Vec::new();
        let mut failures = Vec::new();

        // Unknown ids are carried as Err to be reported as failures
        let employees: Vec<std::result::Result<Employee, String>> = match employee_ids {
            None => self.employees.list_active().await?.into_iter().map(Ok).collect(),
            Some(ids) => {
                let mut found = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.employees.find_by_id(&id).await? {
                        Some(employee) => found.push(Ok(employee)),
                        None => found.push(Err(id)),
                    }
                }
                found
            }
        };

        for employee in employees {
            let employee = match employee {
                Ok(employee) => employee,
                Err(id) => {
                    warn!(employee_id = id.as_str(), "THR skipped: employee not found");
                    failures.push(ThrFailure {
                        message: format!("Employee '{}' not found", id),
                        employee_id: id,
                    });
                    continue;
                }
            };

            match self.calculate_for(&employee, reference_date).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(employee_id = employee.id.as_str(), error = %e, "THR calculation failed");
                    failures.push(ThrFailure {
                        employee_id: employee.id,
                        message: e.to_string(),
                    });
                }
            }
        }

        let summary = ThrSummary::from_results(&results);

        info!(
            reference_date = %reference_date,
            calculated = results.len(),
            failed = failures.len(),
            total = %summary.total_amount,
            "THR batch calculated"
        );

        Ok(ThrBatchResult {
            reference_date,
            results,
            failures,
            summary,
        })
    }
}
