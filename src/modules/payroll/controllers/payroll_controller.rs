use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::payroll::services::PayslipOrchestrator;

#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_date: NaiveDate,
}

/// Open a pay period
/// POST /api/payroll/periods
pub async fn create_period(
    orchestrator: web::Data<Arc<PayslipOrchestrator>>,
    request: web::Json<CreatePeriodRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let period = orchestrator
        .create_period(
            request.name,
            request.start_date,
            request.end_date,
            request.payment_date,
        )
        .await?;
    Ok(HttpResponse::Created().json(period))
}

/// GET /api/payroll/periods/{id}
pub async fn get_period(
    orchestrator: web::Data<Arc<PayslipOrchestrator>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let period = orchestrator.get_period(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(period))
}

/// Run payroll for a period
/// POST /api/payroll/periods/{id}/process
pub async fn process_period(
    orchestrator: web::Data<Arc<PayslipOrchestrator>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let result = orchestrator.run_batch(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Close a processed period
/// POST /api/payroll/periods/{id}/finalize
pub async fn finalize_period(
    orchestrator: web::Data<Arc<PayslipOrchestrator>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let period = orchestrator.finalize_period(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(period))
}

/// Payslips of a period
/// GET /api/payroll/periods/{id}/payslips
pub async fn list_payslips(
    orchestrator: web::Data<Arc<PayslipOrchestrator>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payslips = orchestrator.list_payslips(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payslips))
}

/// Configure payroll routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll/periods")
            .route("", web::post().to(create_period))
            .route("/{id}", web::get().to(get_period))
            .route("/{id}/process", web::post().to(process_period))
            .route("/{id}/finalize", web::post().to(finalize_period))
            .route("/{id}/payslips", web::get().to(list_payslips)),
    );
}
