use crate::analysis::series::PerformancePoint;
use crate::app::PredictionOutcome;
use crate::models::{MatchRecord, MatchResult};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

/// Half-width of the chart axis in characters; the full axis spans [-1, 1].
const AXIS_HALF_WIDTH: usize = 10;

#[derive(Tabled)]
struct PredictionRow {
    rank: String,
    opponent: String,
    probability: String,
    #[tabled(rename = "before temperature")]
    raw: String,
}

#[derive(Tabled)]
struct SeriesRow {
    date: String,
    result: String,
    #[tabled(rename = "cum. avg")]
    average: String,
    #[tabled(rename = "-1 ......... 0 ......... +1")]
    chart: String,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "#")]
    number: String,
    opponent: String,
    result: String,
    note: String,
    recorded: String,
}

pub fn display_predictions(outcome: Option<&PredictionOutcome>, top_n: usize) {
    println!("\n{}", "🎯 Next Opponent Prediction".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let outcome = match outcome {
        Some(outcome) => outcome,
        None => {
            println!(
                "{}",
                "No matches recorded yet. Add some records, then run predict again.".yellow()
            );
            return;
        }
    };

    let top = outcome.top_pick();
    println!(
        "{} {} ({:.2}%)\n",
        "Top pick:".bold(),
        top.name.bold().green(),
        top.final_probability * 100.0
    );

    let rows: Vec<PredictionRow> = outcome
        .ranked
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, p)| PredictionRow {
            rank: format!("#{}", idx + 1),
            opponent: p.name.clone(),
            probability: format!("{:.2}%", p.final_probability * 100.0),
            raw: format!("{:.2}%", p.raw_probability * 100.0),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if outcome.ranked.len() > top_n {
        println!("  … {} more opponents not shown", outcome.ranked.len() - top_n);
    }

    println!("\n{}", "Interpretation".bold().yellow());
    println!("• Probability: chance this opponent is the next one you face");
    println!("• Weighted toward frequent, recently met opponents you tend to lose to");
    println!("• Temperature > 0 flattens the ranking, < 0 sharpens it\n");
}

pub fn display_series(name: &str, series: &[PerformancePoint]) {
    println!(
        "\n{}",
        format!("📈 Performance vs {}", name).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if series.is_empty() {
        println!("{}", format!("No data for {}.", name).yellow());
        return;
    }

    let rows: Vec<SeriesRow> = series
        .iter()
        .map(|point| SeriesRow {
            date: point.time_label.clone(),
            result: raw_label(point.raw_value),
            average: format!("{:+.3}", point.cumulative_average),
            chart: axis_bar(point.cumulative_average),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!("Cumulative average of results (win = +1, draw = 0, loss = -1).\n");
}

pub fn display_records(records: &[MatchRecord], limit: usize) {
    let total = records.len();
    let wins = records.iter().filter(|r| r.result == MatchResult::Win).count();
    let losses = records.iter().filter(|r| r.result == MatchResult::Loss).count();

    println!(
        "\n{}",
        format!("📊 MATCH HISTORY ({} recorded)", total).bold().cyan()
    );
    println!("{}\n", "=".repeat(80).cyan());

    if total == 0 {
        println!("{}", "No matches recorded yet.".yellow());
        return;
    }

    println!(
        "{} {} W / {} L / {} other\n",
        "📈 Overall:".bold(),
        wins.to_string().green(),
        losses.to_string().red(),
        total - wins - losses
    );

    let rows: Vec<RecordRow> = records
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, record)| RecordRow {
            number: format!("{}", idx + 1),
            opponent: record.opponent_name.clone(),
            result: colored_result(record.result),
            note: record.note.clone(),
            recorded: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn colored_result(result: MatchResult) -> String {
    match result {
        MatchResult::Win => "WIN".green().to_string(),
        MatchResult::Loss => "LOSS".red().to_string(),
        MatchResult::Draw => "DRAW".yellow().to_string(),
        MatchResult::Unknown => "?".dimmed().to_string(),
    }
}

fn raw_label(value: f64) -> String {
    if value > 0.0 {
        "WIN".green().to_string()
    } else if value < 0.0 {
        "LOSS".red().to_string()
    } else {
        "-".dimmed().to_string()
    }
}

/// Plain-text marker on a fixed [-1, 1] axis.
fn axis_bar(value: f64) -> String {
    let width = AXIS_HALF_WIDTH * 2 + 1;
    let clamped = value.clamp(-1.0, 1.0);
    let marker = ((clamped + 1.0) * AXIS_HALF_WIDTH as f64).round() as usize;

    (0..width)
        .map(|i| {
            if i == marker {
                '●'
            } else if i == AXIS_HALF_WIDTH {
                '|'
            } else {
                '·'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_bar_places_marker_on_fixed_scale() {
        let low = axis_bar(-1.0);
        let mid = axis_bar(0.0);
        let high = axis_bar(1.0);

        assert_eq!(low.chars().count(), 21);
        assert_eq!(low.chars().next(), Some('●'));
        assert_eq!(mid.chars().nth(10), Some('●'));
        assert_eq!(high.chars().last(), Some('●'));
        assert_eq!(axis_bar(0.5).chars().nth(15), Some('●'));
    }

    #[test]
    fn axis_bar_clamps_out_of_range_values() {
        assert_eq!(axis_bar(3.0), axis_bar(1.0));
        assert_eq!(axis_bar(-3.0), axis_bar(-1.0));
    }
}
