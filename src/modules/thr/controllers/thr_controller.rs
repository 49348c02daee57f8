use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::thr::services::ThrService;

#[derive(Debug, Deserialize)]
pub struct CalculateThrRequest {
    /// Format: YYYY-MM-DD
    pub reference_date: NaiveDate,
    /// Defaults to all active employees
    #[serde(default)]
    pub employee_ids: Option<Vec<String>>,
}

/// Calculate THR for a reference date
/// POST /api/thr/calculate
pub async fn calculate_thr(
    service: web::Data<ThrService>,
    request: web::Json<CalculateThrRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let batch = service
        .calculate_batch(request.reference_date, request.employee_ids)
        .await?;

    Ok(HttpResponse::Ok().json(batch))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/thr").route("/calculate", web::post().to(calculate_thr)));
}
