use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::db::{StatStore, StoreError};
use crate::models::match_result::Match;
use crate::models::player::{Player, PlayerId, StatCounter};

/// Whole-store contents. Also the on-disk layout of the flat file store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl StoreData {
    pub fn increment(&mut self, player_id: &PlayerId, counter: StatCounter) -> Result<(), StoreError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| StoreError::PlayerNotFound(player_id.clone()))?;
        *player.counter_mut(counter) += 1;
        Ok(())
    }

    pub fn fetch_match(&self, match_id: &str) -> Option<Match> {
        self.matches.iter().find(|m| m.id == match_id).cloned()
    }

    pub fn insert_match(&mut self, game: &Match) -> Result<(), StoreError> {
        if self.matches.iter().any(|m| m.id == game.id) {
            return Err(StoreError::Duplicate(game.id.clone()));
        }
        self.matches.push(game.clone());
        Ok(())
    }

    pub fn mark_processed(&mut self, match_id: &str) -> Result<(), StoreError> {
        let game = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| StoreError::MatchNotFound(match_id.to_string()))?;
        game.has_been_processed = true;
        Ok(())
    }

    pub fn list_matches(&self) -> Vec<Match> {
        let mut matches = self.matches.clone();
        // Stable sort keeps later inserts ahead on equal dates after the reverse
        matches.sort_by(|a, b| a.date.cmp(&b.date));
        matches.reverse();
        matches
    }

    pub fn insert_player(&mut self, player: &Player) -> Result<(), StoreError> {
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(StoreError::Duplicate(player.id.to_string()));
        }
        self.players.push(player.clone());
        Ok(())
    }

    pub fn list_players(&self) -> Vec<Player> {
        let mut players = self.players.clone();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }
}

/// Process-local store, used for tests and throwaway local runs.
#[derive(Debug, Default)]
pub struct InMemoryStatStore {
    data: RwLock<StoreData>,
}

impl InMemoryStatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: StoreData) -> Self {
        Self { data: RwLock::new(data) }
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        Self::with_data(StoreData { players, matches: Vec::new() })
    }

    pub async fn player(&self, player_id: &PlayerId) -> Option<Player> {
        self.data
            .read()
            .await
            .players
            .iter()
            .find(|p| &p.id == player_id)
            .cloned()
    }
}

#[async_trait]
impl StatStore for InMemoryStatStore {
    async fn increment(&self, player_id: &PlayerId, counter: StatCounter) -> Result<(), StoreError> {
        self.data.write().await.increment(player_id, counter)
    }

    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        Ok(self.data.read().await.fetch_match(match_id))
    }

    async fn insert_match(&self, game: &Match) -> Result<(), StoreError> {
        self.data.write().await.insert_match(game)
    }

    async fn mark_processed(&self, match_id: &str) -> Result<(), StoreError> {
        self.data.write().await.mark_processed(match_id)
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        Ok(self.data.read().await.list_matches())
    }

    async fn insert_player(&self, player: &Player) -> Result<(), StoreError> {
        self.data.write().await.insert_player(player)
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.data.read().await.list_players())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::models::match_result::Winner;

    fn game(id: &str, days_ago: i64) -> Match {
        Match {
            id: id.to_string(),
            date: Utc::now() - Duration::days(days_ago),
            team_a: vec![PlayerId::from("a")],
            team_b: vec![PlayerId::from("b")],
            team_a_score: None,
            team_b_score: None,
            winner: Winner::Draw,
            potm: None,
            gotm: None,
            has_been_processed: false,
        }
    }

    #[tokio::test]
    async fn increment_unknown_player_fails() {
        let store = InMemoryStatStore::new();
        let err = store.increment(&PlayerId::from("ghost"), StatCounter::Win).await.unwrap_err();
        assert!(matches!(err, StoreError::PlayerNotFound(_)));
    }

    #[tokio::test]
    async fn increment_bumps_single_counter() {
        let store = InMemoryStatStore::with_players(vec![Player::new(PlayerId::from("a"), "Ali")]);
        store.increment(&PlayerId::from("a"), StatCounter::Gotm).await.unwrap();
        store.increment(&PlayerId::from("a"), StatCounter::Gotm).await.unwrap();

        let player = store.player(&PlayerId::from("a")).await.unwrap();
        assert_eq!(player.gotm, 2);
        assert_eq!(player.motm, 0);
    }

    #[tokio::test]
    async fn matches_list_newest_first() {
        let store = InMemoryStatStore::new();
        store.insert_match(&game("old", 10)).await.unwrap();
        store.insert_match(&game("new", 1)).await.unwrap();

        let ids: Vec<String> = store.list_matches().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["new".to_string(), "old".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_match_is_rejected_and_processed_flag_sticks() {
        let store = InMemoryStatStore::new();
        store.insert_match(&game("m1", 0)).await.unwrap();
        assert!(matches!(store.insert_match(&game("m1", 0)).await, Err(StoreError::Duplicate(_))));

        store.mark_processed("m1").await.unwrap();
        assert!(store.fetch_match("m1").await.unwrap().unwrap().has_been_processed);
        assert!(matches!(store.mark_processed("nope").await, Err(StoreError::MatchNotFound(_))));
    }
}
