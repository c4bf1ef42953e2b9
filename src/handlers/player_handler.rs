use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::handlers::stat_error_response;
use crate::models::player::{CreatePlayerRequest, LeaderboardQuery};
use crate::services::leaderboard::rank_players;
use crate::services::match_service::MatchService;

#[tracing::instrument(
    name = "Get leaderboard",
    skip(query, service),
    fields(
        query = %query
    )
)]
pub async fn get_leaderboard(
    query: web::Query<LeaderboardQuery>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.list_players().await {
        Ok(players) => {
            let entries = rank_players(players, &query);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": entries,
                "total_count": entries.len()
            })))
        }
        Err(e) => {
            tracing::error!("Failed to load leaderboard: {}", e);
            Ok(stat_error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Create player", skip(request, service))]
pub async fn create_player(
    request: web::Json<CreatePlayerRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match service.create_player(&request.name).await {
        Ok(player) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": player
        }))),
        Err(e) => {
            tracing::error!("Failed to create player: {}", e);
            Ok(stat_error_response(&e))
        }
    }
}
