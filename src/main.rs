use std::net::TcpListener;

use matchstats_backend::run;
use matchstats_backend::config::settings::get_config;
use matchstats_backend::db::build_store;
use matchstats_backend::services::{MatchService, StatApplier};
use matchstats_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "matchstats-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let store = match build_store(&config.store, &config.database).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("❌ Failed to initialise stat store: {}", e);
            std::process::exit(1);
        }
    };

    let applier = StatApplier::new(store, &config.stats);
    let match_service = MatchService::new(applier);

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("🚀 Listening on {}", address);

    run(
        listener,
        match_service,
        config.application.allowed_origins.clone()
    )?.await
}
