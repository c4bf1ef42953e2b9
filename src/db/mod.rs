use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::config::settings::{DatabaseSettings, StoreBackend, StoreSettings};
use crate::models::match_result::Match;
use crate::models::player::{Player, PlayerId, StatCounter};

pub mod postgres;
pub mod memory;
pub mod json_file;

pub use postgres::PgStatStore;
pub use memory::InMemoryStatStore;
pub use json_file::JsonFileStatStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Duplicate id: {0}")]
    Duplicate(String),
}

/// Persistence seam for players and matches.
///
/// `increment` must be a single atomic "add one" on the store side, never a
/// read-modify-write done by the caller.
#[async_trait]
pub trait StatStore: Send + Sync {
    async fn increment(&self, player_id: &PlayerId, counter: StatCounter) -> Result<(), StoreError>;

    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, StoreError>;

    async fn insert_match(&self, game: &Match) -> Result<(), StoreError>;

    async fn mark_processed(&self, match_id: &str) -> Result<(), StoreError>;

    /// Newest first.
    async fn list_matches(&self) -> Result<Vec<Match>, StoreError>;

    async fn insert_player(&self, player: &Player) -> Result<(), StoreError>;

    async fn list_players(&self) -> Result<Vec<Player>, StoreError>;
}

/// Builds the configured backend. The Postgres pool connects lazily, so bad
/// credentials only show up on the first query.
pub async fn build_store(
    store: &StoreSettings,
    database: &DatabaseSettings,
) -> Result<Arc<dyn StatStore>, StoreError> {
    let stat_store: Arc<dyn StatStore> = match store.backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(16)
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect_lazy(database.connection_string().expose_secret())?;
            Arc::new(PgStatStore::new(pool))
        }
        StoreBackend::Memory => Arc::new(InMemoryStatStore::new()),
        StoreBackend::JsonFile => Arc::new(JsonFileStatStore::open(&store.data_file).await?),
    };

    tracing::info!("Using {:?} stat store", store.backend);
    Ok(stat_store)
}
