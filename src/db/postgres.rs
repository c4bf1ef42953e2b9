use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use crate::db::{StatStore, StoreError};
use crate::models::match_result::{Match, Winner};
use crate::models::player::{Player, PlayerId, StatCounter};

#[derive(Debug, Clone)]
pub struct PgStatStore {
    pool: PgPool,
}

impl PgStatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PlayerRow {
    id: String,
    name: String,
    attended: i32,
    win: i32,
    loss: i32,
    draw: i32,
    motm: i32,
    gotm: i32,
    cleansheet: i32,
    goal_difference: i32,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            id: PlayerId(row.id),
            name: row.name,
            attended: row.attended,
            win: row.win,
            loss: row.loss,
            draw: row.draw,
            motm: row.motm,
            gotm: row.gotm,
            cleansheet: row.cleansheet,
            goal_difference: row.goal_difference,
        }
    }
}

#[derive(Debug, FromRow)]
struct MatchRow {
    id: String,
    date: DateTime<Utc>,
    team_a: Vec<String>,
    team_b: Vec<String>,
    team_a_score: Option<i32>,
    team_b_score: Option<i32>,
    winner: String,
    potm: Option<String>,
    gotm: Option<String>,
    has_been_processed: bool,
}

impl TryFrom<MatchRow> for Match {
    type Error = StoreError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let winner: Winner = row
            .winner
            .parse()
            .map_err(|e: String| StoreError::Database(sqlx::Error::Decode(e.into())))?;

        Ok(Match {
            id: row.id,
            date: row.date,
            team_a: row.team_a.into_iter().map(PlayerId).collect(),
            team_b: row.team_b.into_iter().map(PlayerId).collect(),
            team_a_score: row.team_a_score.and_then(|s| u16::try_from(s).ok()),
            team_b_score: row.team_b_score.and_then(|s| u16::try_from(s).ok()),
            winner,
            potm: row.potm.map(PlayerId),
            gotm: row.gotm.map(PlayerId),
            has_been_processed: row.has_been_processed,
        })
    }
}

const MATCH_COLUMNS: &str = "id, date, team_a, team_b, team_a_score, team_b_score, winner, potm, gotm, has_been_processed";

#[async_trait]
impl StatStore for PgStatStore {
    async fn increment(&self, player_id: &PlayerId, counter: StatCounter) -> Result<(), StoreError> {
        // Column names come from a closed enum, never from the request
        let statement = format!(
            "UPDATE players SET {column} = {column} + 1 WHERE id = $1",
            column = counter.column()
        );

        let result = sqlx::query(&statement)
            .bind(player_id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::PlayerNotFound(player_id.clone()));
        }

        debug!("Incremented {} for player {}", counter, player_id);
        Ok(())
    }

    async fn fetch_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        let statement = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        let row = sqlx::query_as::<_, MatchRow>(&statement)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Match::try_from).transpose()
    }

    async fn insert_match(&self, game: &Match) -> Result<(), StoreError> {
        let team_a: Vec<String> = game.team_a.iter().map(|p| p.0.clone()).collect();
        let team_b: Vec<String> = game.team_b.iter().map(|p| p.0.clone()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO matches (
                id, date, team_a, team_b, team_a_score, team_b_score,
                winner, potm, gotm, has_been_processed
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#
        )
        .bind(&game.id)
        .bind(game.date)
        .bind(&team_a)
        .bind(&team_b)
        .bind(game.team_a_score.map(i32::from))
        .bind(game.team_b_score.map(i32::from))
        .bind(game.winner.as_str())
        .bind(game.potm.as_ref().map(PlayerId::as_str))
        .bind(game.gotm.as_ref().map(PlayerId::as_str))
        .bind(game.has_been_processed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(game.id.clone()));
        }

        info!("Stored match {} ({} vs {} players)", game.id, team_a.len(), team_b.len());
        Ok(())
    }

    async fn mark_processed(&self, match_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE matches SET has_been_processed = TRUE WHERE id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MatchNotFound(match_id.to_string()));
        }
        Ok(())
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let statement = format!("SELECT {} FROM matches ORDER BY date DESC, created_at DESC", MATCH_COLUMNS);
        let rows = sqlx::query_as::<_, MatchRow>(&statement)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Match::try_from).collect()
    }

    async fn insert_player(&self, player: &Player) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO players (
                id, name, attended, win, loss, draw, motm, gotm, cleansheet, goal_difference
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#
        )
        .bind(player.id.as_str())
        .bind(&player.name)
        .bind(player.attended)
        .bind(player.win)
        .bind(player.loss)
        .bind(player.draw)
        .bind(player.motm)
        .bind(player.gotm)
        .bind(player.cleansheet)
        .bind(player.goal_difference)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(player.id.to_string()));
        }
        Ok(())
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, name, attended, win, loss, draw, motm, gotm, cleansheet, goal_difference
            FROM players
            ORDER BY name
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Player::from).collect())
    }
}
