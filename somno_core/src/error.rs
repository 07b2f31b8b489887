//! Error types for the somno_core library.

use chrono::NaiveDate;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for somno_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An entry already exists for the given date
    #[error("an entry for {0} already exists")]
    DuplicateDate(NaiveDate),

    /// Time-of-day string did not parse as HH:MM
    #[error("invalid time of day (expected HH:MM): {0}")]
    InvalidTime(String),

    /// Quality rating outside the 1-10 scale
    #[error("quality must be between 1 and 10, got {0}")]
    InvalidQuality(u8),
}
