// src/routes/matches.rs
use actix_web::{web, HttpResponse, Result};

use crate::handlers::match_handler;
use crate::models::match_result::MatchPayload;
use crate::services::match_service::MatchService;

/// Apply a match payload to player stats
pub async fn update_players(
    payload: web::Json<MatchPayload>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::update_players(payload, service).await
}

/// Record a new match
pub async fn create_match(
    payload: web::Json<MatchPayload>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::create_match(payload, service).await
}

/// All recorded matches, newest first
pub async fn list_matches(
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match_handler::list_matches(service).await
}

/// Get specific match by ID
pub async fn get_match(
    path: web::Path<String>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::get_match(match_id, service).await
}
