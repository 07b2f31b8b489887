#![forbid(unsafe_code)]

//! Core domain model and business logic for the Somno sleep tracker.
//!
//! This crate provides:
//! - Domain types (entries, goals, snapshots)
//! - Sleep duration arithmetic
//! - The entry store and its sort invariant
//! - The aggregation engine (averages, streaks, distributions)
//! - Advisory insights
//! - Snapshot persistence and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod duration;
pub mod store;
pub mod stats;
pub mod insights;
pub mod snapshot;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use duration::{compute_duration, parse_time_of_day};
pub use store::SleepStore;
pub use stats::{
    average_duration, average_quality, quality_distribution, schedule_summary, sleep_score,
    sleep_streak, weekly_averages, BandCount, ScheduleSummary, WeeklyAverage, DEFAULT_WINDOW,
};
pub use insights::{generate_insights, optimal_bedtime, Insight, InsightKind};
pub use export::export_entries;
