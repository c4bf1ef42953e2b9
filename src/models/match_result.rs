// src/models/match_result.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
    #[serde(rename = "draw")]
    Draw,
}

impl Winner {
    pub fn from_scores(score: &Score) -> Self {
        if score.team_a > score.team_b {
            Winner::TeamA
        } else if score.team_a < score.team_b {
            Winner::TeamB
        } else {
            Winner::Draw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::TeamA => "teamA",
            Winner::TeamB => "teamB",
            Winner::Draw => "draw",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Winner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teamA" => Ok(Winner::TeamA),
            "teamB" => Ok(Winner::TeamB),
            "draw" => Ok(Winner::Draw),
            other => Err(format!("Unknown winner '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "teamA")]
    pub team_a: u16,
    #[serde(rename = "teamB")]
    pub team_b: u16,
}

/// A scalar identifier as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RefValue {
    Text(String),
    Number(i64),
}

impl RefValue {
    fn into_string(self) -> String {
        match self {
            RefValue::Text(s) => s.trim().to_string(),
            RefValue::Number(n) => n.to_string(),
        }
    }
}

/// One roster entry. Accepts `{"_ref": ..}`, `{"id": ..}` or a bare string/number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PlayerRef {
    Reference {
        #[serde(rename = "_ref")]
        reference: RefValue,
    },
    Id {
        id: RefValue,
    },
    Bare(RefValue),
}

impl PlayerRef {
    /// `None` for blank references, which forms send for "nobody selected".
    pub fn into_player_id(self) -> Option<PlayerId> {
        let raw = match self {
            PlayerRef::Reference { reference } => reference,
            PlayerRef::Id { id } => id,
            PlayerRef::Bare(value) => value,
        }
        .into_string();

        if raw.is_empty() {
            None
        } else {
            Some(PlayerId(raw))
        }
    }

    /// Like `into_player_id`, but a numeric `0` also means nobody was picked.
    /// Number-keyed forms submit `0` for an unset award select.
    pub fn into_award_id(self) -> Option<PlayerId> {
        let unset = matches!(
            &self,
            PlayerRef::Reference { reference: RefValue::Number(0) }
                | PlayerRef::Id { id: RefValue::Number(0) }
                | PlayerRef::Bare(RefValue::Number(0))
        );
        if unset {
            None
        } else {
            self.into_player_id()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MatchDate {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl MatchDate {
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            MatchDate::DateTime(dt) => *dt,
            MatchDate::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Incoming match body, from the web form or a store webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchPayload {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<RefValue>,
    #[serde(default)]
    pub date: Option<MatchDate>,
    #[serde(default, rename = "teamA")]
    pub team_a: Option<Vec<PlayerRef>>,
    #[serde(default, rename = "teamB")]
    pub team_b: Option<Vec<PlayerRef>>,
    #[serde(default, deserialize_with = "blank_winner")]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default, rename = "teamAScore")]
    pub team_a_score: Option<u16>,
    #[serde(default, rename = "teamBScore")]
    pub team_b_score: Option<u16>,
    #[serde(default, alias = "potmId", alias = "playerOfTheMatch")]
    pub potm: Option<PlayerRef>,
    #[serde(default, alias = "gotmId", alias = "goalOfTheMatch")]
    pub gotm: Option<PlayerRef>,
}

/// Validated input of the stat applier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub winner: Winner,
    pub potm: Option<PlayerId>,
    pub gotm: Option<PlayerId>,
}

impl MatchResult {
    pub fn all_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.team_a.iter().chain(self.team_b.iter())
    }
}

/// A validated submission ready to be stored as a new match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub date: DateTime<Utc>,
    pub score: Option<Score>,
    pub result: MatchResult,
}

impl MatchPayload {
    /// Id of an already stored match, if the caller referenced one.
    pub fn match_id(&self) -> Option<String> {
        self.id
            .clone()
            .map(RefValue::into_string)
            .filter(|id| !id.is_empty())
    }

    pub fn resolved_score(&self) -> Result<Option<Score>, String> {
        if let Some(score) = self.score {
            return Ok(Some(score));
        }
        match (self.team_a_score, self.team_b_score) {
            (Some(team_a), Some(team_b)) => Ok(Some(Score { team_a, team_b })),
            (None, None) => Ok(None),
            _ => Err("teamAScore and teamBScore must be provided together".to_string()),
        }
    }

    /// Scores win over the `winner` field; a conflicting `winner` is rejected.
    pub fn resolved_winner(&self) -> Result<Winner, String> {
        match (self.resolved_score()?, self.winner) {
            (Some(score), Some(hint)) => {
                let derived = Winner::from_scores(&score);
                if derived != hint {
                    return Err(format!(
                        "winner '{}' contradicts score {}-{} (expected '{}')",
                        hint, score.team_a, score.team_b, derived
                    ));
                }
                Ok(derived)
            }
            (Some(score), None) => Ok(Winner::from_scores(&score)),
            (None, Some(hint)) => Ok(hint),
            (None, None) => Ok(Winner::Draw),
        }
    }

    pub fn into_match_result(self) -> Result<MatchResult, String> {
        let winner = self.resolved_winner()?;
        let team_a = roster("teamA", self.team_a)?;
        let team_b = roster("teamB", self.team_b)?;

        Ok(MatchResult {
            team_a,
            team_b,
            winner,
            potm: self.potm.and_then(PlayerRef::into_award_id),
            gotm: self.gotm.and_then(PlayerRef::into_award_id),
        })
    }

    pub fn into_new_match(self) -> Result<NewMatch, String> {
        let score = self.resolved_score()?;
        let date = self.date.as_ref().map(MatchDate::to_utc).unwrap_or_else(Utc::now);
        let result = self.into_match_result()?;
        Ok(NewMatch { date, score, result })
    }
}

/// An unset select arrives as `""`; treat it like an absent `winner`.
fn blank_winner<'de, D>(deserializer: D) -> Result<Option<Winner>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn roster(side: &str, refs: Option<Vec<PlayerRef>>) -> Result<Vec<PlayerId>, String> {
    let refs = match refs {
        Some(refs) if !refs.is_empty() => refs,
        _ => return Err(format!("{} is missing or empty", side)),
    };

    refs.into_iter()
        .enumerate()
        .map(|(index, player)| {
            player
                .into_player_id()
                .ok_or_else(|| format!("{} entry {} has an empty player reference", side, index))
        })
        .collect()
}

/// A match as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub date: DateTime<Utc>,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub team_a_score: Option<u16>,
    pub team_b_score: Option<u16>,
    pub winner: Winner,
    pub potm: Option<PlayerId>,
    pub gotm: Option<PlayerId>,
    #[serde(default)]
    pub has_been_processed: bool,
}

impl Match {
    pub fn from_new(id: String, new_match: NewMatch) -> Self {
        let NewMatch { date, score, result } = new_match;
        Self {
            id,
            date,
            team_a: result.team_a,
            team_b: result.team_b,
            team_a_score: score.map(|s| s.team_a),
            team_b_score: score.map(|s| s.team_b),
            winner: result.winner,
            potm: result.potm,
            gotm: result.gotm,
            has_been_processed: false,
        }
    }

    pub fn result(&self) -> MatchResult {
        MatchResult {
            team_a: self.team_a.clone(),
            team_b: self.team_b.clone(),
            winner: self.winner,
            potm: self.potm.clone(),
            gotm: self.gotm.clone(),
        }
    }
}
