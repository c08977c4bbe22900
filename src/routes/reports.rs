// src/routes/reports.rs
use actix_web::{get, web, HttpResponse, Result};

use crate::handlers::{match_handler, reporting_handler};
use crate::services::{MatchService, ReportingService};

/// Reports for every resulted match, newest first
#[get("/reports/matches")]
async fn get_all_match_reports(
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::get_all_match_reports(service).await
}

/// League table
#[get("/reports/standings")]
async fn get_standings(
    service: web::Data<ReportingService>,
) -> Result<HttpResponse> {
    reporting_handler::get_standings(service).await
}

/// Top 20 goal scorers
#[get("/reports/top-scorers")]
async fn get_top_scorers(
    service: web::Data<ReportingService>,
) -> Result<HttpResponse> {
    reporting_handler::get_top_scorers(service).await
}
