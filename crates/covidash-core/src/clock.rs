//! Wall-clock helpers for `HH:MM` strings and seconds-of-day.
//!
//! All times are UTC. Formatting never zero-pads (`9:5` for 09:05), and
//! parsing accepts either form.

use chrono::{DateTime, Timelike, Utc};
use tracing::warn;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes * 60
}

pub fn hours_to_minutes(hours: u32) -> u32 {
    hours * 60
}

/// Convert `HH:MM` to seconds since midnight.
///
/// Returns `None` (and logs) when the string does not have exactly two
/// `:`-separated numeric parts, or names no valid time of day.
pub fn hhmm_to_seconds(hhmm: &str) -> Option<u32> {
    let parts: Vec<&str> = hhmm.split(':').collect();
    if parts.len() != 2 {
        warn!(input = %hhmm, "incorrect format, expected HH:MM");
        return None;
    }
    let (hours, minutes) = (parse_part(parts[0], hhmm)?, parse_part(parts[1], hhmm)?);
    if hours > 23 || minutes > 59 {
        warn!(input = %hhmm, "time out of range");
        return None;
    }
    Some(minutes_to_seconds(hours_to_minutes(hours)) + minutes_to_seconds(minutes))
}

/// Convert `HH:MM:SS` to seconds since midnight.
pub fn hhmmss_to_seconds(hhmmss: &str) -> Option<u32> {
    let parts: Vec<&str> = hhmmss.split(':').collect();
    if parts.len() != 3 {
        warn!(input = %hhmmss, "incorrect format, expected HH:MM:SS");
        return None;
    }
    let hours = parse_part(parts[0], hhmmss)?;
    let minutes = parse_part(parts[1], hhmmss)?;
    let seconds = parse_part(parts[2], hhmmss)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        warn!(input = %hhmmss, "time out of range");
        return None;
    }
    Some(minutes_to_seconds(hours_to_minutes(hours)) + minutes_to_seconds(minutes) + seconds)
}

fn parse_part(part: &str, whole: &str) -> Option<u32> {
    match part.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(input = %whole, part = %part, "non-numeric time component");
            None
        }
    }
}

/// `H:M` for the given instant, without zero padding.
pub fn hhmm_at(t: DateTime<Utc>) -> String {
    format!("{}:{}", t.hour(), t.minute())
}

/// `H:M` for the current UTC wall-clock time.
pub fn current_time_hhmm() -> String {
    hhmm_at(Utc::now())
}

/// Seconds from `now` until the next occurrence of `target_hhmm`.
///
/// Only hours and minutes of `now` are considered. A target at or before the
/// current minute wraps into tomorrow, so the result is always in `1..=86400`.
pub fn seconds_until(target_hhmm: &str, now: DateTime<Utc>) -> Option<i64> {
    let target = i64::from(hhmm_to_seconds(target_hhmm)?);
    let current = i64::from(hhmm_to_seconds(&hhmm_at(now))?);
    let delta = target - current;
    if delta <= 0 {
        Some(SECONDS_PER_DAY - delta.abs())
    } else {
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hhmm_converts_to_seconds() {
        assert_eq!(hhmm_to_seconds("01:30"), Some(5400));
        assert_eq!(hhmm_to_seconds("0:0"), Some(0));
        assert_eq!(hhmm_to_seconds("23:59"), Some(86_340));
    }

    #[test]
    fn hhmm_rejects_wrong_segment_count() {
        assert_eq!(hhmm_to_seconds("bad"), None);
        assert_eq!(hhmm_to_seconds("01:30:00"), None);
    }

    #[test]
    fn hhmm_rejects_non_numeric_parts() {
        assert_eq!(hhmm_to_seconds("ab:cd"), None);
    }

    #[test]
    fn hhmm_rejects_out_of_range() {
        assert_eq!(hhmm_to_seconds("24:00"), None);
        assert_eq!(hhmm_to_seconds("12:60"), None);
        assert_eq!(hhmm_to_seconds("4294967295:00"), None);
    }

    #[test]
    fn hhmmss_converts_to_seconds() {
        assert_eq!(hhmmss_to_seconds("01:30:15"), Some(5415));
        assert_eq!(hhmmss_to_seconds("01:30"), None);
    }

    #[test]
    fn hhmm_at_does_not_pad() {
        let t = Utc.with_ymd_and_hms(2021, 10, 28, 9, 5, 42).unwrap();
        assert_eq!(hhmm_at(t), "9:5");
    }

    #[test]
    fn seconds_until_later_today() {
        let now = Utc.with_ymd_and_hms(2021, 10, 28, 10, 0, 30).unwrap();
        assert_eq!(seconds_until("10:30", now), Some(1800));
    }

    #[test]
    fn seconds_until_wraps_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2021, 10, 28, 10, 0, 0).unwrap();
        assert_eq!(seconds_until("09:00", now), Some(SECONDS_PER_DAY - 3600));
        // same minute counts as "already passed"
        assert_eq!(seconds_until("10:00", now), Some(SECONDS_PER_DAY));
    }

    #[test]
    fn seconds_until_propagates_bad_input() {
        let now = Utc.with_ymd_and_hms(2021, 10, 28, 10, 0, 0).unwrap();
        assert_eq!(seconds_until("noon", now), None);
    }
}
