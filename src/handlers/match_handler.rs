use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::handlers::stat_error_response;
use crate::models::match_result::MatchPayload;
use crate::services::match_service::MatchService;
use crate::services::stat_applier::ApplyOutcome;

/// Apply a match payload to player stats (webhook / replay entry point)
#[tracing::instrument(
    name = "Update players",
    skip(payload, service),
    fields(
        match_id = ?payload.match_id()
    )
)]
pub async fn update_players(
    payload: web::Json<MatchPayload>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.update_players(payload.into_inner()).await {
        Ok(ApplyOutcome::Applied { increments }) => {
            tracing::info!("Player stats updated with {} increments", increments);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Player stats updated",
                "increments": increments
            })))
        }
        Ok(ApplyOutcome::AlreadyProcessed) => {
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Match already processed"
            })))
        }
        Err(e) => {
            tracing::error!("Failed to update player stats: {}", e);
            Ok(stat_error_response(&e))
        }
    }
}

/// Record a new match and apply its stats
#[tracing::instrument(name = "Create match", skip(payload, service))]
pub async fn create_match(
    payload: web::Json<MatchPayload>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.record_match(payload.into_inner()).await {
        Ok((game, outcome)) => {
            let increments = match outcome {
                ApplyOutcome::Applied { increments } => increments,
                ApplyOutcome::AlreadyProcessed => 0,
            };
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "Match added and player stats updated successfully",
                "match": game,
                "increments": increments
            })))
        }
        Err(e) => {
            tracing::error!("Failed to record match: {}", e);
            Ok(stat_error_response(&e))
        }
    }
}

#[tracing::instrument(name = "List matches", skip(service))]
pub async fn list_matches(service: web::Data<MatchService>) -> Result<HttpResponse> {
    match service.list_matches().await {
        Ok(matches) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": matches,
            "total_count": matches.len()
        }))),
        Err(e) => {
            tracing::error!("Failed to list matches: {}", e);
            Ok(stat_error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Get match", skip(service))]
pub async fn get_match(
    match_id: String,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.get_match(&match_id).await {
        Ok(game) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": game
        }))),
        Err(e) => {
            tracing::warn!("Failed to get match {}: {}", match_id, e);
            Ok(stat_error_response(&e))
        }
    }
}
