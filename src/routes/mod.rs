use actix_web::web;

pub mod backend_health;
pub mod matches;
pub mod players;

use crate::handlers::method_not_allowed;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Stat application, served on both the bare and the /api path
    for path in ["/update-players", "/api/update-players"] {
        cfg.service(
            web::resource(path)
                .route(web::post().to(matches::update_players))
                .default_service(web::route().to(method_not_allowed))
        );
    }

    cfg.service(
        web::resource("/matches")
            .route(web::get().to(matches::list_matches))
            .route(web::post().to(matches::create_match))
            .default_service(web::route().to(method_not_allowed))
    );
    cfg.service(
        web::resource("/matches/{match_id}")
            .route(web::get().to(matches::get_match))
            .default_service(web::route().to(method_not_allowed))
    );
    cfg.service(
        web::resource("/players")
            .route(web::get().to(players::get_leaderboard))
            .route(web::post().to(players::create_player))
            .default_service(web::route().to(method_not_allowed))
    );
}
