pub mod opponent_stats;
pub mod predictor;
pub mod series;
