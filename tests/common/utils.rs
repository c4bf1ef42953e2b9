#![allow(dead_code)]

use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use once_cell::sync::Lazy;
use reqwest::Client;

use matchstats_backend::run;
use matchstats_backend::config::settings::{get_config, StoreBackend};
use matchstats_backend::db::{InMemoryStatStore, StatStore};
use matchstats_backend::models::player::{Player, PlayerId};
use matchstats_backend::services::{MatchService, StatApplier};
use matchstats_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStatStore>,
    pub client: Client,
}

impl TestApp {
    pub async fn player(&self, id: &str) -> Player {
        self.store
            .player(&PlayerId::from(id))
            .await
            .unwrap_or_else(|| panic!("player {} should exist", id))
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Stores a match directly, bypassing the stat applier.
    pub async fn store_unprocessed_match(&self, id: &str, body: serde_json::Value) {
        let payload: matchstats_backend::models::match_result::MatchPayload =
            serde_json::from_value(body).expect("valid match body");
        let new_match = payload.into_new_match().expect("valid match");
        let game = matchstats_backend::models::match_result::Match::from_new(id.to_string(), new_match);
        self.store.insert_match(&game).await.expect("Failed to store match");
    }
}

/// Spawns the app on a random port, backed by an in-memory store seeded with `player_ids`.
pub async fn spawn_app(player_ids: &[&str]) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.store.backend = StoreBackend::Memory;

    let store = Arc::new(InMemoryStatStore::with_players(
        player_ids
            .iter()
            .map(|id| Player::new(PlayerId::from(*id), id.to_uppercase()))
            .collect(),
    ));
    let applier = StatApplier::new(store.clone(), &configuration.stats);

    let server = run(
        listener,
        MatchService::new(applier),
        configuration.application.allowed_origins.clone(),
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        client: Client::new(),
    }
}

pub fn roster(ids: &[&str]) -> serde_json::Value {
    json!(ids.iter().map(|id| json!({ "_ref": id, "_type": "reference" })).collect::<Vec<_>>())
}
