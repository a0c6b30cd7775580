use super::opponent_stats::OpponentAggregate;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

pub const MIN_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub name: String,
    /// Normalized score before temperature scaling.
    pub raw_probability: f64,
    pub final_probability: f64,
}

pub struct OpponentPredictor;

impl OpponentPredictor {
    /// Map the user-facing control in [-5, 5] to a temperature, floored at
    /// `MIN_TEMPERATURE` whatever the caller passes.
    pub fn temperature(temperature_control: f64) -> f64 {
        (1.0 + temperature_control / 10.0).max(MIN_TEMPERATURE)
    }

    /// Base score:
    /// - 0.4 × weighted count relative to the most-faced opponent
    /// - 0.4 × recency of first encounter
    /// - 0.2 × (1 - average score), so opponents we lose to rank higher
    pub fn calculate_base_score(stats: &OpponentAggregate, max_count: f64, now: DateTime<Utc>) -> f64 {
        let frequency = if max_count > 0.0 {
            stats.weighted_count / max_count
        } else {
            0.0
        };

        (0.4 * frequency) + (0.4 * stats.recency_score(now)) + (0.2 * (1.0 - stats.average_score()))
    }

    /// Base score amplified by up to 50% for a streak of recent losses.
    pub fn calculate_score(stats: &OpponentAggregate, max_count: f64, now: DateTime<Utc>) -> f64 {
        Self::calculate_base_score(stats, max_count, now) * (1.0 + 0.5 * stats.trend_boost())
    }

    /// Ranked distribution over who will be faced next, most likely first.
    /// `None` when there is nothing to rank.
    pub fn predict(
        aggregates: &BTreeMap<String, OpponentAggregate>,
        now: DateTime<Utc>,
        temperature_control: f64,
    ) -> Option<Vec<Prediction>> {
        if aggregates.is_empty() {
            return None;
        }

        let max_count = aggregates
            .values()
            .map(|s| s.weighted_count)
            .fold(f64::NEG_INFINITY, f64::max);

        let scores: Vec<(&String, f64)> = aggregates
            .iter()
            .map(|(name, stats)| (name, Self::calculate_score(stats, max_count, now)))
            .collect();

        let total = nonzero_or_one(scores.iter().map(|(_, score)| score).sum());
        let exponent = 1.0 / Self::temperature(temperature_control);

        let scaled: Vec<(&String, f64, f64)> = scores
            .iter()
            .map(|(name, score)| {
                let raw = score / total;
                (*name, raw, raw.powf(exponent))
            })
            .collect();

        let scaled_total = nonzero_or_one(scaled.iter().map(|(_, _, s)| s).sum());

        let mut predictions: Vec<Prediction> = scaled
            .into_iter()
            .map(|(name, raw, s)| Prediction {
                name: name.clone(),
                raw_probability: raw,
                final_probability: s / scaled_total,
            })
            .collect();

        predictions.sort_by(|a, b| {
            b.final_probability
                .partial_cmp(&a.final_probability)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(
            opponents = predictions.len(),
            temperature_control,
            top = %predictions[0].name,
            "computed prediction"
        );

        Some(predictions)
    }
}

fn nonzero_or_one(sum: f64) -> f64 {
    if sum == 0.0 {
        1.0
    } else {
        sum
    }
}
