use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Temperature must be between -5 and 5, got {0}")]
    InvalidTemperature(f64),

    #[error("Storage error: {0}")]
    IoError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}
