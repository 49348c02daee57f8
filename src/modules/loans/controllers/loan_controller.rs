use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::loans::services::LoanLedger;

/// Request body for loan origination
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub employee_id: String,
    pub principal: Decimal,
    pub tenor_months: i32,
    /// Format: YYYY-MM-DD
    pub start_date: NaiveDate,
}

/// Originate a loan
/// POST /api/loans
pub async fn create_loan(
    ledger: web::Data<LoanLedger>,
    request: web::Json<CreateLoanRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let loan = ledger
        .originate(
            request.employee_id,
            request.principal,
            request.tenor_months,
            request.start_date,
        )
        .await?;

    Ok(HttpResponse::Created().json(loan))
}

/// Loan with its repayment ledger
/// GET /api/loans/{id}
pub async fn get_loan(
    ledger: web::Data<LoanLedger>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let schedule = ledger.schedule(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(schedule))
}

/// Payment history
/// GET /api/loans/{id}/payments
pub async fn get_loan_payments(
    ledger: web::Data<LoanLedger>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payments = ledger.payments(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payments))
}

/// Configure loan routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/loans")
            .route("", web::post().to(create_loan))
            .route("/{id}", web::get().to(get_loan))
            .route("/{id}/payments", web::get().to(get_loan_payments)),
    );
}
