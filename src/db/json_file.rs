use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::memory::StoreData;
use crate::db::{StatStore, StoreError};
use crate::models::match_result::Match;
use crate::models::player::{Player, PlayerId, StatCounter};

/// Flat JSON file holding players and matches. Every mutation rewrites the file.
#[derive(Debug)]
pub struct JsonFileStatStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileStatStore {
    /// Loads `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<StoreData>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Data file {} not found, starting with an empty store", path.display());
                StoreData::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Loaded {} players and {} matches from {}",
            data.players.len(),
            data.matches.len(),
            path.display()
        );

        Ok(Self { path, data: Mutex::new(data) })
    }

    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(data)?;
        // Write-then-rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreData) -> Result<(), StoreError> + Send,
    {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        f(&mut next)?;
        self.persist(&next).await?;
        *data = next;
        Ok(())
    }
}

#[async_trait]
impl StatStore for JsonFileStatStore {
    async fn increment(&self, player_id: &PlayerId, counter: StatCounter) -> Result<(), StoreError> {
        self.mutate(|data| data.increment(player_id, counter)).await
    }

    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        Ok(self.data.lock().await.fetch_match(match_id))
    }

    async fn insert_match(&self, game: &Match) -> Result<(), StoreError> {
        self.mutate(|data| data.insert_match(game)).await
    }

    async fn mark_processed(&self, match_id: &str) -> Result<(), StoreError> {
        self.mutate(|data| data.mark_processed(match_id)).await
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        Ok(self.data.lock().await.list_matches())
    }

    async fn insert_player(&self, player: &Player) -> Result<(), StoreError> {
        self.mutate(|data| data.insert_player(player)).await
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.data.lock().await.list_players())
    }
}
