//! Core domain types for the Somno sleep tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Sleep entries and their caller-facing draft/update shapes
//! - Sleep goals and their partial-merge update shape
//! - The snapshot exchanged with the persistence boundary

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serde helper for times-of-day in HH:MM wire format.
pub mod time_hm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Sleep Entry Types
// ============================================================================

/// One recorded sleep session.
///
/// `duration`, `id`, `created_at` and `updated_at` are assigned by the store,
/// never by callers. `duration` is always consistent with the time pair: it is
/// recomputed whenever either `bedtime` or `wake_time` changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub bedtime: NaiveTime,
    #[serde(with = "time_hm")]
    pub wake_time: NaiveTime,
    /// Subjective rating on a 1-10 scale
    pub quality: u8,
    pub notes: Option<String>,
    /// Derived hours asleep, one decimal place
    pub duration: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-settable fields of a new entry; the store derives the rest.
#[derive(Clone, Debug)]
pub struct SleepEntryDraft {
    pub date: NaiveDate,
    pub bedtime: NaiveTime,
    pub wake_time: NaiveTime,
    pub quality: u8,
    pub notes: Option<String>,
}

/// Explicit partial update for an entry.
///
/// Unset fields leave the entry unchanged. `notes` is doubly optional so a
/// caller can distinguish "leave the notes alone" (`None`) from "clear the
/// notes" (`Some(None)`).
#[derive(Clone, Debug, Default)]
pub struct SleepEntryUpdate {
    pub date: Option<NaiveDate>,
    pub bedtime: Option<NaiveTime>,
    pub wake_time: Option<NaiveTime>,
    pub quality: Option<u8>,
    pub notes: Option<Option<String>>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// User-configured sleep targets. Singleton per store, partial-merge updates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SleepGoals {
    /// Target hours of sleep per night
    pub target_sleep_duration: f64,
    pub reminder_enabled: bool,
    pub reminder_minutes_before: u32,
}

impl Default for SleepGoals {
    fn default() -> Self {
        Self {
            target_sleep_duration: 8.0,
            reminder_enabled: false,
            reminder_minutes_before: 30,
        }
    }
}

/// Partial-merge update for goals; unset fields are unchanged.
#[derive(Clone, Debug, Default)]
pub struct SleepGoalsUpdate {
    pub target_sleep_duration: Option<f64>,
    pub reminder_enabled: Option<bool>,
    pub reminder_minutes_before: Option<u32>,
}

// ============================================================================
// Snapshot Type
// ============================================================================

/// The serializable state exchanged with the persistence boundary.
///
/// The host writes this shape verbatim to durable storage and hands the same
/// shape back to initialize a store at startup.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub entries: Vec<SleepEntry>,
    pub goals: SleepGoals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_entry_times_serialize_as_hh_mm() {
        let entry = SleepEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            bedtime: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
            wake_time: NaiveTime::from_hms_opt(6, 45, 0).unwrap(),
            quality: 7,
            notes: None,
            duration: 8.2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"bedtime\":\"22:30\""));
        assert!(json.contains("\"wake_time\":\"06:45\""));

        let back: SleepEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bedtime, entry.bedtime);
        assert_eq!(back.wake_time, entry.wake_time);
    }

    #[test]
    fn test_default_goals() {
        let goals = SleepGoals::default();
        assert_eq!(goals.target_sleep_duration, 8.0);
        assert!(!goals.reminder_enabled);
        assert_eq!(goals.reminder_minutes_before, 30);
    }
}
