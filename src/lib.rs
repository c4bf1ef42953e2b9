use actix_web::{error::InternalError, http, web, App, HttpResponse, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use actix_cors::Cors;
use serde_json::json;

pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod db;
pub mod services;
pub mod telemetry;
use crate::routes::init_routes;
use crate::services::MatchService;

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": message
    }))
}

pub fn run(
    listener: TcpListener,
    match_service: MatchService,
    allowed_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let match_service = web::Data::new(match_service);

    let server = HttpServer::new( move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        // Malformed bodies and query strings get the same JSON envelope as every other error
        let json_config = web::JsonConfig::default().error_handler(|err, _| {
            let response = bad_request(format!("Invalid request: {}", err));
            InternalError::from_response(err, response).into()
        });
        let query_config = web::QueryConfig::default().error_handler(|err, _| {
            let response = bad_request(format!("Invalid query: {}", err));
            InternalError::from_response(err, response).into()
        });

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(json_config)
            .app_data(query_config)
            // Get a pointer copy and attach it to the application state
            .app_data(match_service.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
