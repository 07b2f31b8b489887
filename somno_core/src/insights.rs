//! Advisory insights derived from recent sleep history.
//!
//! Insights are plain data records; wording is fixed English here and any
//! localization or presentation is the host's concern.

use crate::stats::{average_duration, average_quality, schedule_summary};
use crate::{SleepEntry, SleepGoals};
use chrono::{Datelike, NaiveTime, Timelike, Weekday};

/// Severity of an insight
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsightKind {
    Success,
    Info,
    Warning,
}

/// One advisory finding over the recent window
#[derive(Clone, Debug)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub detail: String,
    pub action: String,
}

/// Bedtime spread beyond this is flagged as an inconsistent schedule
const CONSISTENCY_THRESHOLD_MINUTES: f64 = 60.0;
/// Weekend/weekday duration gap beyond this is worth pointing out
const WEEKEND_GAP_HOURS: f64 = 1.5;

/// Generate advisory insights over a recent-entries window.
///
/// An empty window yields a single getting-started message.
pub fn generate_insights(window: &[SleepEntry], goals: &SleepGoals) -> Vec<Insight> {
    if window.is_empty() {
        return vec![Insight {
            kind: InsightKind::Info,
            title: "Start your sleep journey".into(),
            detail: "Begin logging your sleep to receive personalized insights.".into(),
            action: "Log your first sleep entry to get started".into(),
        }];
    }

    let mut insights = Vec::new();
    let avg_duration = average_duration(window);
    let avg_quality = average_quality(window);

    // Duration band
    if avg_duration < 7.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Insufficient sleep duration".into(),
            detail: format!(
                "Your average sleep duration is {:.1} hours. Most adults need 7-9 hours.",
                avg_duration
            ),
            action: "Try going to bed 30 minutes earlier each night".into(),
        });
    } else if avg_duration > 9.0 {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Long sleep duration".into(),
            detail: format!(
                "You're averaging {:.1} hours of sleep. Make sure it's quality sleep.",
                avg_duration
            ),
            action: "Monitor your sleep quality and daytime energy".into(),
        });
    } else {
        insights.push(Insight {
            kind: InsightKind::Success,
            title: "Good sleep duration".into(),
            detail: format!(
                "Your average of {:.1} hours is within the recommended range.",
                avg_duration
            ),
            action: "Keep maintaining this healthy sleep duration".into(),
        });
    }

    // Quality band
    if avg_quality < 6.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Low sleep quality".into(),
            detail: format!(
                "Your average sleep quality is {:.1}/10, which suggests room for improvement.",
                avg_quality
            ),
            action: "Consider room temperature, noise, and screen time before bed".into(),
        });
    } else if avg_quality >= 8.0 {
        insights.push(Insight {
            kind: InsightKind::Success,
            title: "Excellent sleep quality".into(),
            detail: format!("Your sleep quality average of {:.1}/10 is excellent.", avg_quality),
            action: "Continue your current sleep habits and routines".into(),
        });
    }

    // Bedtime consistency
    if window.len() > 1 {
        if let Some(summary) = schedule_summary(window) {
            if summary.bedtime_stddev_minutes > CONSISTENCY_THRESHOLD_MINUTES {
                insights.push(Insight {
                    kind: InsightKind::Warning,
                    title: "Inconsistent sleep schedule".into(),
                    detail: "Your bedtime varies significantly from night to night.".into(),
                    action: "Try to go to bed and wake up at the same time every day".into(),
                });
            } else {
                insights.push(Insight {
                    kind: InsightKind::Success,
                    title: "Consistent sleep schedule".into(),
                    detail: "You maintain a steady bedtime, which supports your circadian rhythm."
                        .into(),
                    action: "Keep up the consistent sleep schedule".into(),
                });
            }
        }
    }

    // Weekend vs weekday durations
    if let Some(gap) = weekend_weekday_gap(window) {
        if gap > WEEKEND_GAP_HOURS {
            insights.push(Insight {
                kind: InsightKind::Info,
                title: "Weekend sleep pattern difference".into(),
                detail: format!(
                    "Your weekend sleep differs from weekdays by {:.1} hours.",
                    gap
                ),
                action: "Try to maintain similar sleep patterns on weekends".into(),
            });
        }
    }

    // Goal progress
    if avg_duration + 0.25 < goals.target_sleep_duration {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Below your sleep goal".into(),
            detail: format!(
                "You're averaging {:.1} hours against a goal of {:.1}.",
                avg_duration, goals.target_sleep_duration
            ),
            action: format!(
                "A bedtime of {} would hit your goal with a 07:00 wake-up",
                optimal_bedtime(
                    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
                    goals.target_sleep_duration
                )
                .format("%H:%M")
            ),
        });
    }

    insights
}

/// Suggested bedtime for a target wake time and the goal duration, wrapping
/// backward over midnight when needed.
pub fn optimal_bedtime(wake_time: NaiveTime, target_hours: f64) -> NaiveTime {
    let wake_minutes = i64::from(wake_time.hour()) * 60 + i64::from(wake_time.minute());
    let target_minutes = (target_hours * 60.0).round() as i64;
    let bed_minutes = (wake_minutes - target_minutes).rem_euclid(24 * 60) as u32;

    NaiveTime::from_hms_opt(bed_minutes / 60, bed_minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Absolute difference between mean weekend and mean weekday duration.
///
/// `None` unless the window has at least one of each.
fn weekend_weekday_gap(window: &[SleepEntry]) -> Option<f64> {
    let is_weekend =
        |e: &&SleepEntry| matches!(e.date.weekday(), Weekday::Sat | Weekday::Sun);

    let weekend: Vec<&SleepEntry> = window.iter().filter(is_weekend).collect();
    let weekday: Vec<&SleepEntry> = window.iter().filter(|e| !is_weekend(e)).collect();

    if weekend.is_empty() || weekday.is_empty() {
        return None;
    }

    let mean = |entries: &[&SleepEntry]| {
        entries.iter().map(|e| e.duration).sum::<f64>() / entries.len() as f64
    };

    Some((mean(&weekend) - mean(&weekday)).abs())
}
