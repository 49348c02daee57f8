use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reimbursement claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReimbursementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReimbursementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for ReimbursementStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid reimbursement status: {}", value)),
        }
    }
}

/// Expense claim passed through to the payslip once approved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reimbursement {
    pub id: String,
    pub employee_id: String,
    pub amount: Decimal,
    pub status: ReimbursementStatus,
    pub paid_at: Option<NaiveDateTime>,
}

impl Reimbursement {
    /// Approved claims that have not been paid out yet are added to net pay
    pub fn is_payable(&self) -> bool {
        self.status == ReimbursementStatus::Approved && self.paid_at.is_none()
    }
}
