//! Sleep duration arithmetic.
//!
//! Converts a (bedtime, wake time) pair of wall-clock times into hours slept,
//! treating a wake time at or before the bedtime as occurring on the next
//! calendar day.

use crate::{Error, Result};
use chrono::{NaiveTime, Timelike};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Compute hours slept from a bedtime and wake time.
///
/// If the wake time is at or before the bedtime on the clock it is taken to be
/// on the following day, so `23:00` to `07:00` is 8.0 hours. Equal times yield
/// 24.0 hours by the same rule; that is deliberate policy, not an error. The
/// result is rounded to one decimal place and is always strictly positive.
pub fn compute_duration(bedtime: NaiveTime, wake_time: NaiveTime) -> f64 {
    let bed_minutes = minutes_since_midnight(bedtime);
    let mut wake_minutes = minutes_since_midnight(wake_time);

    // Overnight sleep: wake time is on the next day
    if wake_minutes <= bed_minutes {
        wake_minutes += MINUTES_PER_DAY;
    }

    let hours = (wake_minutes - bed_minutes) as f64 / 60.0;
    (hours * 10.0).round() / 10.0
}

/// Parse a boundary-supplied HH:MM string into a time of day.
///
/// This is the validation step the core otherwise assumes has happened;
/// malformed input never reaches `compute_duration`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| Error::InvalidTime(s.to_string()))
}

fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_same_day_duration() {
        // Nap: bedtime before wake time on the same clock day
        assert_eq!(compute_duration(t(13, 0), t(15, 30)), 2.5);
        assert_eq!(compute_duration(t(0, 0), t(8, 0)), 8.0);
    }

    #[test]
    fn test_overnight_duration() {
        assert_eq!(compute_duration(t(23, 0), t(7, 0)), 8.0);
        assert_eq!(compute_duration(t(22, 30), t(6, 45)), 8.3);
        // Two minutes across midnight rounds down to 0.0 at one decimal
        assert_eq!(compute_duration(t(23, 59), t(0, 1)), 0.0);
    }

    #[test]
    fn test_overnight_formula() {
        // wake <= bed: duration is (1440 - bed + wake) / 60
        let bed_minutes = 22 * 60 + 15;
        let wake_minutes = 5 * 60 + 45;
        let expected = ((1440 - bed_minutes + wake_minutes) as f64 / 60.0 * 10.0).round() / 10.0;

        assert_eq!(compute_duration(t(22, 15), t(5, 45)), expected);
        assert!(compute_duration(t(22, 15), t(5, 45)) > 0.0);
    }

    #[test]
    fn test_equal_times_is_full_day() {
        // The next-day rule pushes the degenerate case to a full 24 hours
        assert_eq!(compute_duration(t(22, 0), t(22, 0)), 24.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // 7h 40m = 7.666... -> 7.7
        assert_eq!(compute_duration(t(23, 20), t(7, 0)), 7.7);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("22:30").unwrap(), t(22, 30));
        assert_eq!(parse_time_of_day("00:00").unwrap(), t(0, 0));
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("9pm").is_err());
        assert!(parse_time_of_day("").is_err());
    }
}
