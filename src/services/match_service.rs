use std::sync::Arc;
use uuid::Uuid;

use crate::db::StatStore;
use crate::models::match_result::{Match, MatchPayload};
use crate::models::player::{Player, PlayerId};
use crate::services::stat_applier::{ApplyOutcome, StatApplier, StatError};

/// Match and player bookkeeping around the stat applier.
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn StatStore>,
    applier: StatApplier,
}

impl MatchService {
    pub fn new(applier: StatApplier) -> Self {
        Self {
            store: Arc::clone(applier.store()),
            applier,
        }
    }

    /// Stores a new match and applies its stats through the guarded path.
    ///
    /// If applying fails the match stays stored and unprocessed, so it can be
    /// replayed by id.
    #[tracing::instrument(name = "Record match", skip(self, payload))]
    pub async fn record_match(&self, payload: MatchPayload) -> Result<(Match, ApplyOutcome), StatError> {
        let new_match = payload.into_new_match().map_err(StatError::Validation)?;
        let game = Match::from_new(Uuid::new_v4().to_string(), new_match);

        self.store.insert_match(&game).await?;
        tracing::info!("Recorded match {} on {}, winner {}", game.id, game.date, game.winner);

        let outcome = self.applier.apply_stored_match(&game.id).await?;
        let stored = self
            .store
            .fetch_match(&game.id)
            .await?
            .unwrap_or(game);

        Ok((stored, outcome))
    }

    /// Replays a webhook body: by id when it references a stored match, otherwise
    /// straight from the rosters it carries.
    #[tracing::instrument(name = "Update players from payload", skip(self, payload))]
    pub async fn update_players(&self, payload: MatchPayload) -> Result<ApplyOutcome, StatError> {
        if let Some(match_id) = payload.match_id() {
            return self.applier.apply_stored_match(&match_id).await;
        }

        let result = payload.into_match_result().map_err(StatError::Validation)?;
        self.applier.apply_match_result(&result).await
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Match, StatError> {
        self.store
            .fetch_match(match_id)
            .await?
            .ok_or_else(|| StatError::MatchNotFound(match_id.to_string()))
    }

    pub async fn list_matches(&self) -> Result<Vec<Match>, StatError> {
        Ok(self.store.list_matches().await?)
    }

    #[tracing::instrument(name = "Create player", skip(self))]
    pub async fn create_player(&self, name: &str) -> Result<Player, StatError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StatError::Validation("Player name cannot be empty".to_string()));
        }
        if name.len() > 100 {
            return Err(StatError::Validation("Player name too long (maximum 100 characters)".to_string()));
        }

        let player = Player::new(PlayerId(Uuid::new_v4().to_string()), name);
        self.store.insert_player(&player).await?;
        tracing::info!("Created player {} ({})", player.name, player.id);
        Ok(player)
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, StatError> {
        Ok(self.store.list_players().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::StatsSettings;
    use crate::db::InMemoryStatStore;
    use crate::models::match_result::Winner;
    use serde_json::json;

    async fn service_with_players(names: &[&str]) -> (MatchService, Vec<Player>) {
        let store: Arc<dyn StatStore> = Arc::new(InMemoryStatStore::new());
        let service = MatchService::new(StatApplier::new(store, &StatsSettings::default()));
        let mut players = Vec::new();
        for name in names {
            players.push(service.create_player(name).await.unwrap());
        }
        (service, players)
    }

    fn payload(value: serde_json::Value) -> MatchPayload {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn record_match_stores_and_processes() {
        let (service, players) = service_with_players(&["Alan", "Basma"]).await;
        let (game, outcome) = service
            .record_match(payload(json!({
                "date": "2025-03-01T18:00:00Z",
                "teamA": [players[0].id.as_str()],
                "teamB": [players[1].id.as_str()],
                "teamAScore": 3,
                "teamBScore": 1,
                "potmId": players[0].id.as_str()
            })))
            .await
            .unwrap();

        assert_eq!(outcome, ApplyOutcome::Applied { increments: 5 });
        assert_eq!(game.winner, Winner::TeamA);
        assert!(game.has_been_processed);

        let replay = service.update_players(payload(json!({"_id": game.id}))).await.unwrap();
        assert_eq!(replay, ApplyOutcome::AlreadyProcessed);

        let alan = service.list_players().await.unwrap().into_iter().find(|p| p.name == "Alan").unwrap();
        assert_eq!((alan.attended, alan.win, alan.motm), (1, 1, 1));
    }

    #[tokio::test]
    async fn record_match_with_unknown_player_stays_unprocessed() {
        let (service, players) = service_with_players(&["Alan"]).await;
        let err = service
            .record_match(payload(json!({
                "teamA": [players[0].id.as_str()],
                "teamB": ["nobody"]
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, StatError::Store(_)));

        let matches = service.list_matches().await.unwrap();
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].has_been_processed);
    }

    #[tokio::test]
    async fn invalid_submission_is_not_stored() {
        let (service, _) = service_with_players(&[]).await;
        let err = service.record_match(payload(json!({"teamA": ["x"]}))).await.unwrap_err();
        assert!(matches!(err, StatError::Validation(_)));
        assert!(service.list_matches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_player_name_is_rejected() {
        let (service, _) = service_with_players(&[]).await;
        assert!(matches!(service.create_player("   ").await, Err(StatError::Validation(_))));
    }
}
