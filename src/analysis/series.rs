//! Cumulative performance trend against a single opponent.

use crate::models::{MatchRecord, MatchResult};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub result: MatchResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePoint {
    pub time_label: String,
    /// Running mean of `raw_value` up to and including this point, 3 decimals.
    pub cumulative_average: f64,
    pub raw_value: f64,
}

/// One opponent's matches, oldest first, from a newest-first log.
pub fn opponent_history(records: &[MatchRecord], name: &str) -> Vec<HistoryEntry> {
    records
        .iter()
        .rev()
        .filter(|r| r.opponent_name == name)
        .map(|r| HistoryEntry {
            timestamp: r.timestamp,
            result: r.result,
        })
        .collect()
}

/// Prefix averages over `history`, keeping only the last `window_size` points.
pub fn build_series(history: &[HistoryEntry], window_size: usize) -> Vec<PerformancePoint> {
    let mut cum = 0.0;
    let series: Vec<PerformancePoint> = history
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let value = entry.result.value();
            cum += value;
            PerformancePoint {
                time_label: entry.timestamp.format("%Y-%m-%d").to_string(),
                cumulative_average: round3(cum / (i + 1) as f64),
                raw_value: value,
            }
        })
        .collect();

    let skip = series.len().saturating_sub(window_size);
    series.into_iter().skip(skip).collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
