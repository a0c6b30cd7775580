use crate::analysis::opponent_stats::DEFAULT_DECAY_FACTOR;
use crate::error::AppError;
use crate::store::RecordStore;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CHART_WINDOW: usize = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub decay_factor: f64,
    pub chart_window: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let data_file = env::var("NEXT_OPPONENT_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| RecordStore::default_path());

        let decay_factor = match env::var("NEXT_OPPONENT_DECAY") {
            Ok(raw) => parse_decay(&raw)?,
            Err(_) => DEFAULT_DECAY_FACTOR,
        };

        let chart_window = match env::var("NEXT_OPPONENT_CHART_WINDOW") {
            Ok(raw) => parse_window(&raw).map_err(|_| {
                AppError::ConfigError(format!(
                    "NEXT_OPPONENT_CHART_WINDOW must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_CHART_WINDOW,
        };

        Ok(Config {
            data_file,
            decay_factor,
            chart_window,
        })
    }
}

/// Chart window size. Zero would hide every point, so it is rejected.
pub fn parse_window(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(window) if window > 0 => Ok(window),
        _ => Err(AppError::ConfigError(format!(
            "window must be a positive integer, got '{}'",
            raw
        ))),
    }
}

fn parse_decay(raw: &str) -> Result<f64, AppError> {
    let value = raw.trim().parse::<f64>().map_err(|_| {
        AppError::ConfigError(format!("NEXT_OPPONENT_DECAY is not a number: '{}'", raw))
    })?;

    // Weights must shrink (or stay flat) with age and stay positive.
    if value <= 0.0 || value > 1.0 {
        return Err(AppError::ConfigError(format!(
            "NEXT_OPPONENT_DECAY must be in (0, 1], got {}",
            value
        )));
    }

    Ok(value)
}
