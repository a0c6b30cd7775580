use crate::models::{MatchRecord, MatchResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_DECAY_FACTOR: f64 = 0.95;

/// Losses only count toward the trend when they sit among this many most
/// recent log entries.
pub const RECENT_LOSS_WINDOW: usize = 5;

/// Losses needed for the trend boost to saturate.
const TREND_SATURATION: f64 = 3.0;

/// Weight of the record at `position` in a newest-first log.
pub fn age_weight(position: usize, decay_factor: f64) -> f64 {
    decay_factor.powf(position as f64 / 3.0)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpponentAggregate {
    pub weighted_count: f64,
    pub weighted_score: f64, // +w per win, -w per loss
    pub recent_loss_count: u32,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl OpponentAggregate {
    /// Weighted result average, roughly in [-1, 1].
    pub fn average_score(&self) -> f64 {
        if self.weighted_count > 0.0 {
            self.weighted_score / self.weighted_count
        } else {
            0.0
        }
    }

    pub fn earliest_seen(&self) -> Option<DateTime<Utc>> {
        self.timestamps.iter().min().copied()
    }

    /// `1 / (1 + age_days / 10)` where age is measured from the first
    /// encounter. Never reaches zero.
    pub fn recency_score(&self, now: DateTime<Utc>) -> f64 {
        let age_days = self
            .earliest_seen()
            .map(|first| {
                let millis = now.signed_duration_since(first).num_milliseconds();
                (millis as f64 / 86_400_000.0).max(0.0)
            })
            .unwrap_or(0.0);

        1.0 / (1.0 + age_days / 10.0)
    }

    pub fn trend_boost(&self) -> f64 {
        (self.recent_loss_count as f64 / TREND_SATURATION).min(1.0)
    }
}

pub struct OpponentStatsTracker {
    decay_factor: f64,
    stats: BTreeMap<String, OpponentAggregate>,
}

impl OpponentStatsTracker {
    pub fn new(decay_factor: f64) -> Self {
        OpponentStatsTracker {
            decay_factor,
            stats: BTreeMap::new(),
        }
    }

    /// Fold one record in. `position` is its index in the newest-first log.
    pub fn add_encounter(&mut self, record: &MatchRecord, position: usize) {
        let weight = age_weight(position, self.decay_factor);
        let entry = self
            .stats
            .entry(record.opponent_name.clone())
            .or_default();

        entry.weighted_count += weight;
        entry.timestamps.push(record.timestamp);

        match record.result {
            MatchResult::Win => entry.weighted_score += weight,
            MatchResult::Loss => {
                entry.weighted_score -= weight;
                if position < RECENT_LOSS_WINDOW {
                    entry.recent_loss_count += 1;
                }
            }
            MatchResult::Draw | MatchResult::Unknown => {}
        }
    }

    pub fn into_stats(self) -> BTreeMap<String, OpponentAggregate> {
        self.stats
    }
}

/// Fold a newest-first log into per-opponent weighted statistics.
pub fn aggregate(records: &[MatchRecord], decay_factor: f64) -> BTreeMap<String, OpponentAggregate> {
    let mut tracker = OpponentStatsTracker::new(decay_factor);
    for (position, record) in records.iter().enumerate() {
        tracker.add_encounter(record, position);
    }

    let stats = tracker.into_stats();
    debug!(
        records = records.len(),
        opponents = stats.len(),
        decay_factor,
        "aggregated match log"
    );
    stats
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    pub(crate) fn record(name: &str, result: MatchResult, days_ago: i64) -> MatchRecord {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        MatchRecord {
            id: format!("{}-{}", name, days_ago),
            opponent_name: name.to_string(),
            result,
            note: String::new(),
            timestamp: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn empty_log_gives_empty_aggregates() {
        assert!(aggregate(&[], DEFAULT_DECAY_FACTOR).is_empty());
    }

    #[test]
    fn age_weight_strictly_decreases_with_position() {
        let weights: Vec<f64> = (0..30).map(|i| age_weight(i, DEFAULT_DECAY_FACTOR)).collect();
        assert_eq!(weights[0], 1.0);
        for pair in weights.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn wins_and_losses_move_score_draws_only_count() {
        let log = vec![
            record("Layla", MatchResult::Win, 0),
            record("Layla", MatchResult::Loss, 1),
            record("Layla", MatchResult::Draw, 2),
            record("Layla", MatchResult::Unknown, 3),
        ];
        let stats = aggregate(&log, DEFAULT_DECAY_FACTOR);
        let layla = &stats["Layla"];

        let w: Vec<f64> = (0..4).map(|i| age_weight(i, DEFAULT_DECAY_FACTOR)).collect();
        assert!((layla.weighted_count - w.iter().sum::<f64>()).abs() < 1e-12);
        assert!((layla.weighted_score - (w[0] - w[1])).abs() < 1e-12);
        assert_eq!(layla.recent_loss_count, 1);
        assert_eq!(layla.timestamps.len(), 4);
    }

    #[test]
    fn only_losses_in_first_five_positions_count_as_recent() {
        let mut log = vec![
            record("Zilong", MatchResult::Loss, 0),
            record("Zilong", MatchResult::Loss, 1),
            record("Miya", MatchResult::Win, 2),
            record("Zilong", MatchResult::Loss, 3),
            record("Miya", MatchResult::Win, 4),
        ];
        log.push(record("Zilong", MatchResult::Loss, 5));

        let stats = aggregate(&log, DEFAULT_DECAY_FACTOR);
        assert_eq!(stats["Zilong"].recent_loss_count, 3);
        assert_eq!(stats["Zilong"].trend_boost(), 1.0);
        assert_eq!(stats["Miya"].trend_boost(), 0.0);
    }

    #[test]
    fn trend_boost_saturates_at_three_losses() {
        let mut agg = OpponentAggregate::default();
        agg.recent_loss_count = 2;
        assert!((agg.trend_boost() - 2.0 / 3.0).abs() < 1e-12);
        agg.recent_loss_count = 5;
        assert_eq!(agg.trend_boost(), 1.0);
    }

    #[test]
    fn recency_score_uses_earliest_encounter() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let log = vec![
            record("Tigreal", MatchResult::Win, 2),
            record("Tigreal", MatchResult::Win, 10),
        ];
        let stats = aggregate(&log, DEFAULT_DECAY_FACTOR);
        assert!((stats["Tigreal"].recency_score(now) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn future_timestamps_do_not_exceed_full_recency() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let log = vec![record("Eudora", MatchResult::Win, -30)];
        let stats = aggregate(&log, DEFAULT_DECAY_FACTOR);
        assert_eq!(stats["Eudora"].recency_score(now), 1.0);
    }
}
