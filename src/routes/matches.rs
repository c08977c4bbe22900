// src/routes/matches.rs
use actix_web::{delete, get, post, web, HttpResponse, Result};

use crate::handlers::match_handler;
use crate::middleware::auth::{AuthMiddleware, Claims};
use crate::models::fixture::{CreateMatchRequest, ReportResultRequest};
use crate::services::MatchService;

/// Schedule a match (authenticated)
#[post("/matches", wrap = "AuthMiddleware")]
async fn create_match(
    request: web::Json<CreateMatchRequest>,
    service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::create_match(request, service, claims).await
}

/// List scheduled matches
#[get("/matches")]
async fn get_all_matches(
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::get_all_matches(service).await
}

/// Get a match by id
#[get("/matches/{match_id}")]
async fn get_match(
    path: web::Path<String>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::get_match_by_id(path.into_inner(), service).await
}

/// Report a match result (authenticated)
#[post("/matches/{match_id}/result", wrap = "AuthMiddleware")]
async fn report_result(
    path: web::Path<String>,
    request: web::Json<ReportResultRequest>,
    service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::report_result(path.into_inner(), request, service, claims).await
}

/// Get the reported result of a match with its goals
#[get("/matches/{match_id}/result")]
async fn get_match_result(
    path: web::Path<String>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::get_match_result(path.into_inner(), service).await
}

/// Get the report of a match
#[get("/matches/{match_id}/report")]
async fn get_match_report(
    path: web::Path<String>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::get_match_report(path.into_inner(), service).await
}

/// Delete a match with its result and goals (authenticated)
#[delete("/matches/{match_id}", wrap = "AuthMiddleware")]
async fn delete_match(
    path: web::Path<String>,
    service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::delete_match(path.into_inner(), service, claims).await
}
