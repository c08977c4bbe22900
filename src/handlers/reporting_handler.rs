use actix_web::{web, HttpResponse, Result};

use crate::models::common::ApiResponse;
use crate::services::ReportingService;

pub async fn get_standings(service: web::Data<ReportingService>) -> Result<HttpResponse> {
    let standings = service.get_standings().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Standings retrieved successfully", standings)))
}

pub async fn get_top_scorers(service: web::Data<ReportingService>) -> Result<HttpResponse> {
    let scorers = service.get_top_scorers().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Top scorers retrieved successfully", scorers)))
}
