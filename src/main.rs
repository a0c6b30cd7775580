mod analysis;
mod app;
mod config;
mod display;
mod error;
mod ids;
mod models;
mod store;

use anyhow::Context;
use app::AppState;
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::Config;
use display::output::{
    display_error, display_info, display_predictions, display_records, display_series,
    display_success,
};
use error::AppError;
use ids::UuidGenerator;
use models::MatchResult;
use std::path::PathBuf;
use store::RecordStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "next_opponent")]
#[command(about = "Track matches against opponents and predict who you'll face next", long_about = None)]
struct Args {
    /// Match log location (overrides NEXT_OPPONENT_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a match against an opponent
    Add {
        /// Opponent name
        name: String,

        #[arg(short, long, value_enum, default_value = "win")]
        result: MatchResult,

        /// Optional note
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// Rank opponents by how likely you are to face them next
    Predict {
        /// Sharpen (< 0) or flatten (> 0) the distribution, from -5 to 5
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        temperature: f64,

        /// Number of opponents to display
        #[arg(long, default_value = "10")]
        top: usize,

        /// Also chart performance against the top pick
        #[arg(long)]
        chart: bool,
    },
    /// Chart cumulative performance against one opponent
    Chart {
        name: String,

        /// Number of most recent points to show
        #[arg(short, long, value_parser = config::parse_window)]
        window: Option<usize>,
    },
    /// List recorded matches, newest first
    History {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Delete every recorded match
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "next_opponent=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(path) = args.data_file {
        config.data_file = path;
    }

    execute(args.command, &config)
}

/// Predict controls outside [-5, 5] are rejected before they reach the model.
fn check_temperature(temperature: f64) -> Result<f64, AppError> {
    if (-5.0..=5.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(AppError::InvalidTemperature(temperature))
    }
}

fn execute(command: Command, config: &Config) -> anyhow::Result<()> {
    let store = RecordStore::new(config.data_file.clone());
    let state = AppState::from_records(store.load());

    match command {
        Command::Add { name, result, note } => {
            let state = state.add_record(&name, result, &note, &mut UuidGenerator, Utc::now());
            if state.is_dirty() {
                store
                    .save(state.records())
                    .with_context(|| format!("Failed to save {}", store.path().display()))?;
                display_success(&format!(
                    "Recorded {} against {} ({} matches total)",
                    result,
                    name.trim(),
                    state.records().len()
                ));
            } else {
                display_info("Opponent name is empty, nothing recorded");
            }
        }
        Command::Predict {
            temperature,
            top,
            chart,
        } => {
            let temperature = check_temperature(temperature)?;
            let state = state.run_predict(Utc::now(), temperature, config.decay_factor);
            display_predictions(state.prediction(), top);

            if chart {
                if let Some(top_pick) = state.prediction().map(|p| p.top_pick().name.clone()) {
                    let state = state.select_opponent(&top_pick);
                    display_series(&top_pick, &state.performance_series(config.chart_window));
                }
            }
        }
        Command::Chart { name, window } => {
            let state = state.select_opponent(&name);
            let series = state.performance_series(window.unwrap_or(config.chart_window));
            display_series(state.selected_opponent().unwrap_or(&name), &series);
        }
        Command::History { limit } => {
            display_records(state.records(), limit);
        }
        Command::Clear { yes } => {
            if !yes {
                display_info(&format!(
                    "This deletes all {} recorded matches. Re-run with --yes to confirm.",
                    state.records().len()
                ));
                return Ok(());
            }

            let state = state.clear();
            if state.is_dirty() {
                store
                    .clear()
                    .with_context(|| format!("Failed to clear {}", store.path().display()))?;
            }
            display_success("Match log cleared");
        }
    }

    Ok(())
}
