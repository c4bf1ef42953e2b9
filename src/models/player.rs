// src/models/player.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque player reference. Document stores hand out strings, relational ones integers;
/// both end up here as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub attended: i32,
    #[serde(default)]
    pub win: i32,
    #[serde(default)]
    pub loss: i32,
    #[serde(default)]
    pub draw: i32,
    #[serde(default)]
    pub motm: i32,
    #[serde(default)]
    pub gotm: i32,
    // Maintained outside the stat applier
    #[serde(default)]
    pub cleansheet: i32,
    #[serde(default)]
    pub goal_difference: i32,
}

impl Player {
    /// A freshly seeded player with every counter at zero.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attended: 0,
            win: 0,
            loss: 0,
            draw: 0,
            motm: 0,
            gotm: 0,
            cleansheet: 0,
            goal_difference: 0,
        }
    }

    pub fn counter_mut(&mut self, counter: StatCounter) -> &mut i32 {
        match counter {
            StatCounter::Attended => &mut self.attended,
            StatCounter::Win => &mut self.win,
            StatCounter::Loss => &mut self.loss,
            StatCounter::Draw => &mut self.draw,
            StatCounter::Motm => &mut self.motm,
            StatCounter::Gotm => &mut self.gotm,
        }
    }

    /// Rounded share of attended matches that were won, 0 when nothing was played.
    pub fn win_percentage(&self) -> u32 {
        if self.attended <= 0 {
            return 0;
        }
        ((self.win.max(0) as f64 / self.attended as f64) * 100.0).round() as u32
    }
}

/// Counters the stat applier is allowed to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCounter {
    Attended,
    Win,
    Loss,
    Draw,
    Motm,
    Gotm,
}

impl StatCounter {
    /// Column / field name in the store. Only ever one of these literals.
    pub fn column(&self) -> &'static str {
        match self {
            StatCounter::Attended => "attended",
            StatCounter::Win => "win",
            StatCounter::Loss => "loss",
            StatCounter::Draw => "draw",
            StatCounter::Motm => "motm",
            StatCounter::Gotm => "gotm",
        }
    }
}

impl fmt::Display for StatCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSortKey {
    Name,
    Attended,
    #[default]
    Win,
    Draw,
    Loss,
    Motm,
    Gotm,
    Cleansheet,
    GoalDifference,
}

impl PlayerSortKey {
    pub fn compare(&self, a: &Player, b: &Player) -> Ordering {
        match self {
            PlayerSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            PlayerSortKey::Attended => a.attended.cmp(&b.attended),
            PlayerSortKey::Win => a.win.cmp(&b.win),
            PlayerSortKey::Draw => a.draw.cmp(&b.draw),
            PlayerSortKey::Loss => a.loss.cmp(&b.loss),
            PlayerSortKey::Motm => a.motm.cmp(&b.motm),
            PlayerSortKey::Gotm => a.gotm.cmp(&b.gotm),
            PlayerSortKey::Cleansheet => a.cleansheet.cmp(&b.cleansheet),
            PlayerSortKey::GoalDifference => a.goal_difference.cmp(&b.goal_difference),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub sort_by: Option<PlayerSortKey>,
    pub order: Option<SortOrder>,
}

impl fmt::Display for LeaderboardQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sort_by={:?}, order={:?}", self.sort_by, self.order)
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub player: Player,
    pub win_percentage: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_starts_at_zero() {
        let player = Player::new(PlayerId::from("p1"), "Zain");
        assert_eq!(player.attended, 0);
        assert_eq!(player.goal_difference, 0);
        assert_eq!(player.win_percentage(), 0);
    }

    #[test]
    fn counter_mut_targets_the_named_field() {
        let mut player = Player::new(PlayerId::from("p1"), "Zain");
        *player.counter_mut(StatCounter::Motm) += 1;
        *player.counter_mut(StatCounter::Draw) += 2;
        assert_eq!(player.motm, 1);
        assert_eq!(player.draw, 2);
        assert_eq!(player.win, 0);
    }

    #[test]
    fn win_percentage_rounds() {
        let mut player = Player::new(PlayerId::from("p1"), "Isa");
        player.attended = 3;
        player.win = 2;
        assert_eq!(player.win_percentage(), 67);
    }

    #[test]
    fn player_deserializes_with_missing_counters() {
        let player: Player = serde_json::from_str(r#"{"id": "abc", "name": "Niro", "win": 4}"#).unwrap();
        assert_eq!(player.win, 4);
        assert_eq!(player.loss, 0);
        assert_eq!(player.id, PlayerId::from("abc"));
    }

    #[test]
    fn sort_key_parses_snake_case() {
        let query: LeaderboardQuery = serde_json::from_str(r#"{"sort_by": "goal_difference", "order": "asc"}"#).unwrap();
        assert_eq!(query.sort_by, Some(PlayerSortKey::GoalDifference));
        assert_eq!(query.order, Some(SortOrder::Asc));
    }
}
