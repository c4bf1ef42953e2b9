// src/routes/players.rs
use actix_web::{web, HttpResponse, Result};

use crate::handlers::player_handler;
use crate::models::player::{CreatePlayerRequest, LeaderboardQuery};
use crate::services::match_service::MatchService;

/// Player leaderboard
pub async fn get_leaderboard(
    query: web::Query<LeaderboardQuery>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    player_handler::get_leaderboard(query, service).await
}

/// Seed a new player with zeroed counters
pub async fn create_player(
    request: web::Json<CreatePlayerRequest>,
    service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    player_handler::create_player(request, service).await
}
