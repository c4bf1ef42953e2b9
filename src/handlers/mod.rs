use actix_web::HttpResponse;
use serde_json::json;

use crate::services::stat_applier::StatError;

pub mod backend_health_handler;
pub mod match_handler;
pub mod player_handler;

/// Maps a service error to the response callers see. Store failures stay opaque.
pub fn stat_error_response(error: &StatError) -> HttpResponse {
    match error {
        StatError::Validation(_) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": error.to_string()
        })),
        StatError::MatchNotFound(match_id) => HttpResponse::NotFound().json(json!({
            "success": false,
            "message": format!("Match {} not found", match_id)
        })),
        StatError::Store(_) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Internal Server Error"
        })),
    }
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({
        "success": false,
        "message": "Method Not Allowed"
    }))
}
