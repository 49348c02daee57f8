use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::payroll::models::Payslip;

/// Monthly pay period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PayPeriod {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: PeriodStatus,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_employer_contributions: Decimal,
    pub total_employee_contributions: Decimal,
    pub total_tax: Decimal,
    pub total_loan_deductions: Decimal,
    pub employee_count: i32,
    pub processed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Period lifecycle: draft -> processing -> finalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Draft,
    /// At least one batch run has written totals
    Processing,
    /// Closed; no further runs
    Finalized,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Processing => "processing",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PeriodStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(Self::Draft),
            "processing" => Ok(Self::Processing),
            "finalized" => Ok(Self::Finalized),
            _ => Err(format!("Invalid period status: {}", value)),
        }
    }
}

impl PayPeriod {
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        payment_date: NaiveDate,
    ) -> Result<Self> {
        if start_date > end_date {
            return Err(AppError::validation(format!(
                "Period start {} is after end {}",
                start_date, end_date
            )));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            start_date,
            end_date,
            payment_date,
            status: PeriodStatus::Draft,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_employer_contributions: Decimal::ZERO,
            total_employee_contributions: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            total_loan_deductions: Decimal::ZERO,
            employee_count: 0,
            processed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Withholding month, taken from the period end
    pub fn tax_month(&self) -> u32 {
        self.end_date.month()
    }

    pub fn tax_year(&self) -> i32 {
        self.end_date.year()
    }

    /// A finalized period cannot be run again
    pub fn ensure_processable(&self) -> Result<()> {
        if self.status == PeriodStatus::Finalized {
            return Err(AppError::validation(format!(
                "Period {} is finalized and cannot be processed",
                self.id
            )));
        }
        Ok(())
    }

    /// Store run totals and move to `processing`
    pub fn apply_totals(&mut self, totals: &PeriodTotals) {
        let now = chrono::Utc::now().naive_utc();

        self.total_gross = totals.total_gross;
        self.total_net = totals.total_net;
        self.total_employer_contributions = totals.total_employer_contributions;
        self.total_employee_contributions = totals.total_employee_contributions;
        self.total_tax = totals.total_tax;
        self.total_loan_deductions = totals.total_loan_deductions;
        self.employee_count = totals.employee_count;
        self.status = PeriodStatus::Processing;
        self.processed_at = Some(now);
        self.updated_at = now;
    }

    /// processing -> finalized
    pub fn finalize(&mut self) -> Result<()> {
        if self.status != PeriodStatus::Processing {
            return Err(AppError::validation(format!(
                "Only processing periods can be finalized, period {} is {}",
                self.id, self.status
            )));
        }

        self.status = PeriodStatus::Finalized;
        self.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }
}

/// Aggregates written onto the period after a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_employer_contributions: Decimal,
    pub total_employee_contributions: Decimal,
    pub total_tax: Decimal,
    pub total_loan_deductions: Decimal,
    pub employee_count: i32,
}

impl PeriodTotals {
    pub fn add(&mut self, payslip: &Payslip) {
        self.total_gross += payslip.gross_salary;
        self.total_net += payslip.net_salary;
        self.total_employer_contributions += payslip.contributions.employer_total;
        self.total_employee_contributions += payslip.contributions.employee_total;
        self.total_tax += payslip.tax_amount;
        self.total_loan_deductions += payslip.loan_deduction;
        self.employee_count += 1;
    }

    pub fn from_payslips<'a>(payslips: impl IntoIterator<Item = &'a Payslip>) -> Self {
        payslips.into_iter().fold(Self::default(), |mut totals, payslip| {
            totals.add(payslip);
            totals
        })
    }
}
