//! Application state and the transitions the CLI drives.
//!
//! Every transition takes the state by value and hands back the next one.
//! Persistence stays outside: the caller saves when [`AppState::is_dirty`]
//! reports a mutation.

use crate::analysis::opponent_stats::aggregate;
use crate::analysis::predictor::{OpponentPredictor, Prediction};
use crate::analysis::series::{build_series, opponent_history, PerformancePoint};
use crate::ids::IdGenerator;
use crate::models::{MatchRecord, MatchResult};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub ranked: Vec<Prediction>,
}

impl PredictionOutcome {
    pub fn top_pick(&self) -> &Prediction {
        // predict() never returns an empty ranking
        &self.ranked[0]
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    records: Vec<MatchRecord>,
    prediction: Option<PredictionOutcome>,
    selected_opponent: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        AppState {
            records,
            ..Default::default()
        }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn prediction(&self) -> Option<&PredictionOutcome> {
        self.prediction.as_ref()
    }

    pub fn selected_opponent(&self) -> Option<&str> {
        self.selected_opponent.as_deref()
    }

    /// True once the record log has changed and needs saving.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Prepend a new record. Blank names are ignored.
    pub fn add_record(
        mut self,
        name: &str,
        result: MatchResult,
        note: &str,
        ids: &mut impl IdGenerator,
        now: DateTime<Utc>,
    ) -> Self {
        let name = name.trim();
        if name.is_empty() {
            debug!("ignoring record with blank opponent name");
            return self;
        }

        let record = MatchRecord {
            id: ids.next_id(),
            opponent_name: name.to_string(),
            result,
            note: note.to_string(),
            timestamp: now,
        };
        info!(opponent = name, result = %result, id = %record.id, "recorded match");

        self.records.insert(0, record);
        self.dirty = true;
        self
    }

    pub fn run_predict(mut self, now: DateTime<Utc>, temperature_control: f64, decay_factor: f64) -> Self {
        let stats = aggregate(&self.records, decay_factor);
        self.prediction = OpponentPredictor::predict(&stats, now, temperature_control)
            .map(|ranked| PredictionOutcome { ranked });
        self
    }

    pub fn select_opponent(mut self, name: &str) -> Self {
        self.selected_opponent = Some(name.trim().to_string());
        self
    }

    /// Series for the selected opponent; empty when nothing is selected or
    /// the opponent has no matches.
    pub fn performance_series(&self, window_size: usize) -> Vec<PerformancePoint> {
        match &self.selected_opponent {
            Some(name) => build_series(&opponent_history(&self.records, name), window_size),
            None => Vec::new(),
        }
    }

    pub fn clear(mut self) -> Self {
        info!(records = self.records.len(), "clearing match log");
        self.records.clear();
        self.prediction = None;
        self.selected_opponent = None;
        self.dirty = true;
        self
    }
}
