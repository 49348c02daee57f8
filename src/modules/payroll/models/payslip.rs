use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::contributions::ContributionResult;
use crate::modules::withholding::{PtkpCode, TaxMethod, TerCategory, YearToDate};

/// One employee's pay for one period. Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: String,
    pub employee_id: String,
    pub period_id: String,

    pub base_salary: Decimal,
    /// 0 unless the employee joined inside the period
    pub prorated_salary: Decimal,
    pub is_prorated: bool,
    pub attendance_days: i32,
    pub business_days: i32,
    pub allowance_total: Decimal,
    pub overtime_pay: Decimal,
    pub gross_salary: Decimal,

    #[serde(flatten)]
    pub contributions: ContributionResult,

    pub tax_amount: Decimal,
    pub tax_method: TaxMethod,
    pub tax_category: Option<TerCategory>,
    pub ptkp_code: PtkpCode,

    pub loan_deduction: Decimal,
    pub late_penalty: Decimal,
    pub late_minutes: i32,
    pub reimbursement_total: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,

    pub status: PayslipStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payslip lifecycle: draft -> finalized -> paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    Draft,
    Finalized,
    Paid,
}

impl PayslipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PayslipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PayslipStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(Self::Draft),
            "finalized" => Ok(Self::Finalized),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Invalid payslip status: {}", value)),
        }
    }
}

impl Payslip {
    /// The salary that entered gross: prorated when prorated, else base
    pub fn earned_salary(&self) -> Decimal {
        if self.is_prorated {
            self.prorated_salary
        } else {
            self.base_salary
        }
    }

    /// Net recomputed from the components
    pub fn expected_net(&self) -> Decimal {
        let gross = self.earned_salary() + self.allowance_total + self.overtime_pay;
        let deductions = self.contributions.employee_total
            + self.tax_amount
            + self.loan_deduction
            + self.late_penalty;
        gross - deductions + self.reimbursement_total
    }

    pub fn is_balanced(&self) -> bool {
        self.gross_salary == self.earned_salary() + self.allowance_total + self.overtime_pay
            && self.net_salary == self.expected_net()
    }
}

impl YearToDate {
    /// Year-to-date sums from earlier payslips of the same calendar year
    pub fn from_payslips<'a>(payslips: impl IntoIterator<Item = &'a Payslip>) -> Self {
        payslips.into_iter().fold(Self::default(), |mut ytd, payslip| {
            ytd.add_month(
                payslip.gross_salary,
                payslip.contributions.employee_total,
                payslip.tax_amount,
            );
            ytd
        })
    }
}
