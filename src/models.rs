use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Outcome of a match from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
    Unknown,
}

impl MatchResult {
    /// Numeric value plotted on the performance chart.
    pub fn value(self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Loss => -1.0,
            MatchResult::Draw | MatchResult::Unknown => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
            MatchResult::Draw => "draw",
            MatchResult::Unknown => "unknown",
        }
    }
}

// Older or hand-edited logs may carry labels we don't know; count them as unknown.
impl From<String> for MatchResult {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "win" => MatchResult::Win,
            "loss" => MatchResult::Loss,
            "draw" => MatchResult::Draw,
            _ => MatchResult::Unknown,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the match log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(rename = "name")]
    pub opponent_name: String,
    pub result: MatchResult,
    #[serde(default)]
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

// Logs exported from the browser app carry numeric ids like 1718000000000.123.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
