use actix_web::{web, HttpResponse, Result};

use crate::middleware::auth::Claims;
use crate::models::common::{ApiResponse, CreatedResource};
use crate::models::fixture::{CreateMatchRequest, MatchResponse, MatchResultResponse, ReportResultRequest};
use crate::services::MatchService;

/// Schedule a new match
#[tracing::instrument(
    name = "Create match request",
    skip(request, service, claims),
    fields(username = %claims.username)
)]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let id = service.create_match(&request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Match created successfully",
        CreatedResource { id },
    )))
}

pub async fn get_all_matches(service: web::Data<MatchService>) -> Result<HttpResponse> {
    let matches = service.get_all_matches().await?;
    let data: Vec<MatchResponse> = matches.iter().map(MatchResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success("Matches retrieved successfully", data)))
}

pub async fn get_match_by_id(
    match_id: String,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let fixture = service.get_match_by_id(&match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Match retrieved successfully",
        MatchResponse::from(&fixture),
    )))
}

/// Report the final score and goal log of a match
#[tracing::instrument(
    name = "Report result request",
    skip(request, service, claims),
    fields(match_id = %match_id, username = %claims.username)
)]
pub async fn report_result(
    match_id: String,
    request: web::Json<ReportResultRequest>,
    service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let id = service.report_result(&match_id, &request).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Match result reported successfully",
        CreatedResource { id },
    )))
}

pub async fn get_match_result(
    match_id: String,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let result = service.get_match_result(&match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Match result retrieved successfully",
        MatchResultResponse::from(&result),
    )))
}

pub async fn get_match_report(
    match_id: String,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let report = service.get_match_report(&match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match report retrieved successfully", report)))
}

pub async fn get_all_match_reports(service: web::Data<MatchService>) -> Result<HttpResponse> {
    let reports = service.get_all_match_reports().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match reports retrieved successfully", reports)))
}

/// Delete a match together with its result and goals
#[tracing::instrument(
    name = "Delete match request",
    skip(service, claims),
    fields(match_id = %match_id, username = %claims.username)
)]
pub async fn delete_match(
    match_id: String,
    service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    service.delete_match(&match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Match deleted successfully")))
}
