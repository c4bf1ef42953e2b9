pub mod stat_applier;
pub mod match_service;
pub mod leaderboard;

pub use stat_applier::{StatApplier, StatError, ApplyOutcome};
pub use match_service::MatchService;
