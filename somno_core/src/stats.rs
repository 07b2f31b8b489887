//! Rolling sleep statistics over a most-recent-entries window.
//!
//! Every function here is read-only over a caller-supplied slice of entries
//! (date-descending, as the store maintains them) and total: empty input
//! yields zeros or empty collections, never an error.

use crate::SleepEntry;
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default window size for the rolling averages
pub const DEFAULT_WINDOW: usize = 7;

/// A named quality band on the 1-10 scale
#[derive(Clone, Debug)]
pub struct QualityBand {
    pub label: &'static str,
    pub min: u8,
    pub max: u8,
}

/// Band table, built once and reused across all distribution queries
static QUALITY_BANDS: Lazy<Vec<QualityBand>> = Lazy::new(|| {
    vec![
        QualityBand { label: "Excellent", min: 8, max: 10 },
        QualityBand { label: "Good", min: 6, max: 7 },
        QualityBand { label: "Fair", min: 4, max: 5 },
        QualityBand { label: "Poor", min: 1, max: 3 },
    ]
});

/// Entry count for one quality band
#[derive(Clone, Debug, Serialize)]
pub struct BandCount {
    pub label: &'static str,
    pub min: u8,
    pub max: u8,
    pub count: usize,
}

/// Per-week duration and quality means
#[derive(Clone, Debug, Serialize)]
pub struct WeeklyAverage {
    /// Sunday-aligned start of the week
    pub week_start: NaiveDate,
    pub avg_duration: f64,
    pub avg_quality: f64,
    pub nights: usize,
}

/// Mean clock times and bedtime spread over a window
#[derive(Clone, Debug)]
pub struct ScheduleSummary {
    pub avg_bedtime: NaiveTime,
    pub avg_wake_time: NaiveTime,
    /// Standard deviation of bedtime, in minutes
    pub bedtime_stddev_minutes: f64,
}

/// Mean quality over the window; `0.0` when empty.
pub fn average_quality(window: &[SleepEntry]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let total: u32 = window.iter().map(|e| u32::from(e.quality)).sum();
    f64::from(total) / window.len() as f64
}

/// Mean duration in hours over the window; `0.0` when empty.
pub fn average_duration(window: &[SleepEntry]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let total: f64 = window.iter().map(|e| e.duration).sum();
    total / window.len() as f64
}

/// Count consecutive logged calendar days, walking backward from `today`.
///
/// Entries must be date-descending. An entry is accepted when it matches the
/// cursor exactly, or when the streak is still zero and the entry is exactly
/// one day behind the cursor (so a streak is not broken merely because today
/// has not been logged yet). Returns `0` for an empty collection.
pub fn sleep_streak(entries: &[SleepEntry], today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut cursor = today;

    for entry in entries {
        let day_diff = (cursor - entry.date).num_days();

        if day_diff == 0 || (day_diff == 1 && streak == 0) {
            streak += 1;
        } else {
            break;
        }

        cursor = match entry.date.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => break,
        };
    }

    streak
}

/// Bucket entries into the named quality bands, zero-filling empty bands.
pub fn quality_distribution(window: &[SleepEntry]) -> Vec<BandCount> {
    QUALITY_BANDS
        .iter()
        .map(|band| BandCount {
            label: band.label,
            min: band.min,
            max: band.max,
            count: window
                .iter()
                .filter(|e| e.quality >= band.min && e.quality <= band.max)
                .count(),
        })
        .collect()
}

/// Group entries by the Sunday-aligned start of their week.
///
/// Weeks are returned oldest first. Duration means are rounded to two
/// decimals and quality means to one, matching the entry-level precision.
pub fn weekly_averages(window: &[SleepEntry]) -> Vec<WeeklyAverage> {
    let mut weeks: BTreeMap<NaiveDate, (f64, u32, usize)> = BTreeMap::new();

    for entry in window {
        let days_from_sunday = entry.date.weekday().num_days_from_sunday();
        let week_start = entry.date - chrono::Duration::days(i64::from(days_from_sunday));

        let bucket = weeks.entry(week_start).or_insert((0.0, 0, 0));
        bucket.0 += entry.duration;
        bucket.1 += u32::from(entry.quality);
        bucket.2 += 1;
    }

    weeks
        .into_iter()
        .map(|(week_start, (duration, quality, nights))| WeeklyAverage {
            week_start,
            avg_duration: round_to(duration / nights as f64, 2),
            avg_quality: round_to(f64::from(quality) / nights as f64, 1),
            nights,
        })
        .collect()
}

/// Composite 0-100 sleep score: 60% quality, 40% duration against target.
pub fn sleep_score(avg_quality: f64, avg_duration: f64, target_hours: f64) -> u32 {
    if target_hours <= 0.0 {
        return 0;
    }
    let quality_part = (avg_quality / 10.0).clamp(0.0, 1.0) * 0.6;
    let duration_part = (avg_duration / target_hours).clamp(0.0, 1.0) * 0.4;
    ((quality_part + duration_part) * 100.0).round() as u32
}

/// Mean bedtime/wake time and bedtime spread; `None` for an empty window.
pub fn schedule_summary(window: &[SleepEntry]) -> Option<ScheduleSummary> {
    if window.is_empty() {
        return None;
    }

    let bedtimes: Vec<f64> = window
        .iter()
        .map(|e| minutes_of(e.bedtime) as f64)
        .collect();
    let wake_times: Vec<f64> = window
        .iter()
        .map(|e| minutes_of(e.wake_time) as f64)
        .collect();

    let avg_bed = bedtimes.iter().sum::<f64>() / bedtimes.len() as f64;
    let avg_wake = wake_times.iter().sum::<f64>() / wake_times.len() as f64;

    let variance = bedtimes
        .iter()
        .map(|m| (m - avg_bed).powi(2))
        .sum::<f64>()
        / bedtimes.len() as f64;

    Some(ScheduleSummary {
        avg_bedtime: time_from_minutes(avg_bed),
        avg_wake_time: time_from_minutes(avg_wake),
        bedtime_stddev_minutes: variance.sqrt(),
    })
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_from_minutes(minutes: f64) -> NaiveTime {
    let total = (minutes.round() as i64).rem_euclid(24 * 60) as u32;
    NaiveTime::from_hms_opt(total / 60, total % 60, 0).unwrap_or(NaiveTime::MIN)
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
