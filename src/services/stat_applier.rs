use futures::stream::{self, TryStreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::settings::StatsSettings;
use crate::db::{StatStore, StoreError};
use crate::models::match_result::{MatchResult, Winner};
use crate::models::player::{PlayerId, StatCounter};

#[derive(Debug, thiserror::Error)]
pub enum StatError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// One "add 1 to counter" call against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Increment {
    pub player_id: PlayerId,
    pub counter: StatCounter,
}

impl Increment {
    fn new(player_id: &PlayerId, counter: StatCounter) -> Self {
        Self { player_id: player_id.clone(), counter }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { increments: usize },
    AlreadyProcessed,
}

/// Ordered list of increments a finished match produces.
///
/// Attendance for everyone first, then the result counters, then the two awards.
/// A player listed twice gets counted twice; awards are independent of each other
/// and of the recipient's team.
pub fn plan_increments(result: &MatchResult) -> Vec<Increment> {
    let mut plan: Vec<Increment> = result
        .all_players()
        .map(|player| Increment::new(player, StatCounter::Attended))
        .collect();

    match result.winner {
        Winner::TeamA => {
            plan.extend(result.team_a.iter().map(|p| Increment::new(p, StatCounter::Win)));
            plan.extend(result.team_b.iter().map(|p| Increment::new(p, StatCounter::Loss)));
        }
        Winner::TeamB => {
            plan.extend(result.team_b.iter().map(|p| Increment::new(p, StatCounter::Win)));
            plan.extend(result.team_a.iter().map(|p| Increment::new(p, StatCounter::Loss)));
        }
        Winner::Draw => {
            plan.extend(result.all_players().map(|p| Increment::new(p, StatCounter::Draw)));
        }
    }

    if let Some(potm) = &result.potm {
        plan.push(Increment::new(potm, StatCounter::Motm));
    }
    if let Some(gotm) = &result.gotm {
        plan.push(Increment::new(gotm, StatCounter::Gotm));
    }

    plan
}

/// Applies match results to per-player counters.
///
/// Increments are not batched and not transactional: if one fails the rest are
/// skipped and the ones already written stay written.
#[derive(Clone)]
pub struct StatApplier {
    store: Arc<dyn StatStore>,
    max_concurrent_increments: usize,
}

impl StatApplier {
    pub fn new(store: Arc<dyn StatStore>, settings: &StatsSettings) -> Self {
        Self {
            store,
            max_concurrent_increments: settings.max_concurrent_increments.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn StatStore> {
        &self.store
    }

    /// Unguarded variant: applies the payload as given. Replaying it counts twice.
    #[tracing::instrument(
        name = "Apply match result",
        skip(self, result),
        fields(
            team_a = result.team_a.len(),
            team_b = result.team_b.len(),
            winner = %result.winner
        )
    )]
    pub async fn apply_match_result(&self, result: &MatchResult) -> Result<ApplyOutcome, StatError> {
        if result.team_a.is_empty() || result.team_b.is_empty() {
            return Err(StatError::Validation("teamA and teamB must both be non-empty".to_string()));
        }

        let plan = plan_increments(result);
        let total = plan.len();
        let applied = AtomicUsize::new(0);

        let run = stream::iter(plan.into_iter().map(Ok::<Increment, StoreError>))
            .try_for_each_concurrent(self.max_concurrent_increments, |increment| {
                let store = Arc::clone(&self.store);
                let applied = &applied;
                async move {
                    store.increment(&increment.player_id, increment.counter).await?;
                    applied.fetch_add(1, Ordering::Relaxed);
                    Ok::<(), StoreError>(())
                }
            })
            .await;

        if let Err(e) = run {
            tracing::error!(
                "❌ Stat application aborted after {}/{} increments: {}",
                applied.load(Ordering::Relaxed),
                total,
                e
            );
            return Err(e.into());
        }

        tracing::info!("✅ Applied {} stat increments", total);
        Ok(ApplyOutcome::Applied { increments: total })
    }

    /// Guarded variant: loads the stored match, skips it when already processed,
    /// and flags it once every increment has gone through.
    #[tracing::instrument(name = "Apply stored match", skip(self))]
    pub async fn apply_stored_match(&self, match_id: &str) -> Result<ApplyOutcome, StatError> {
        let game = self
            .store
            .fetch_match(match_id)
            .await?
            .ok_or_else(|| StatError::MatchNotFound(match_id.to_string()))?;

        if game.has_been_processed {
            tracing::warn!("⚠️ Match {} already processed. Skipping", match_id);
            return Ok(ApplyOutcome::AlreadyProcessed);
        }

        tracing::info!("📦 Processing match {}", match_id);
        let outcome = self.apply_match_result(&game.result()).await?;

        self.store.mark_processed(match_id).await?;
        tracing::info!("Match {} marked as processed", match_id);

        Ok(outcome)
    }
}
