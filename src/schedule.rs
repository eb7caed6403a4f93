//! Schedule calculation
//!
//! Pure translation between wall-clock time, a configured timezone, and the
//! chime domain: which hour (1-12) to chime for, and the instant of the next
//! top-of-hour. No storage or playback concerns live here.

use std::str::FromStr;

use chrono::{DateTime, Duration, Local, Timelike, Utc};
use thiserror::Error;

/// Sentinel timezone value meaning "use the system-local timezone".
pub const AUTO_TIMEZONE: &str = "auto";

/// Forward skew applied before computing the chime hour, so that an alarm
/// firing slightly early still resolves to the hour about to start.
pub const CHIME_HOUR_SKEW_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unrecognized timezone identifier '{0}'")]
    UnknownTimezone(String),
}

/// A configured timezone: either the system-local zone or a named IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    Auto,
    Named(chrono_tz::Tz),
}

impl FromStr for Timezone {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == AUTO_TIMEZONE {
            return Ok(Self::Auto);
        }
        s.parse::<chrono_tz::Tz>()
            .map(Self::Named)
            .map_err(|_| ScheduleError::UnknownTimezone(s.to_string()))
    }
}

/// Hour, minute and second of the instant as observed in the zone.
fn clock_parts(instant: DateTime<Utc>, timezone: Timezone) -> (u32, u32, u32) {
    match timezone {
        Timezone::Auto => {
            let t = instant.with_timezone(&Local);
            (t.hour(), t.minute(), t.second())
        }
        Timezone::Named(zone) => {
            let t = instant.with_timezone(&zone);
            (t.hour(), t.minute(), t.second())
        }
    }
}

/// Render the instant as a 12-hour wall-clock time string in the zone
/// (e.g. `3:04:05 PM`). Handles offsets not aligned to whole hours.
pub fn current_time_in_zone(instant: DateTime<Utc>, timezone: Timezone) -> String {
    match timezone {
        Timezone::Auto => instant
            .with_timezone(&Local)
            .format("%-I:%M:%S %p")
            .to_string(),
        Timezone::Named(zone) => instant
            .with_timezone(&zone)
            .format("%-I:%M:%S %p")
            .to_string(),
    }
}

/// Chime hour (1-12) for the given instant in the zone.
///
/// The instant is advanced by [`CHIME_HOUR_SKEW_MINUTES`] so a slightly-early
/// alarm firing still selects the hour about to start. Hour 0 and hour 12
/// both resolve to 12 (12-hour clock convention).
pub fn chime_hour_at(instant: DateTime<Utc>, timezone: Timezone) -> u8 {
    let skewed = instant + Duration::minutes(CHIME_HOUR_SKEW_MINUTES);
    let (hour, _, _) = clock_parts(skewed, timezone);
    let hour = (hour % 12) as u8;
    if hour == 0 { 12 } else { hour }
}

/// Chime hour (1-12) for "now" in the zone.
pub fn chime_hour(timezone: Timezone) -> u8 {
    chime_hour_at(Utc::now(), timezone)
}

/// The instant of the next top-of-hour as observed in the zone, with
/// sub-second precision zeroed.
///
/// Composed from two offsets: seconds to the next whole minute, then minutes
/// to the next whole hour. The composition lands exactly on the hour boundary
/// even when the current seconds or minutes are zero; an instant already on
/// an hour boundary yields the boundary one hour ahead.
pub fn next_top_of_hour_at(instant: DateTime<Utc>, timezone: Timezone) -> DateTime<Utc> {
    let (_, minute, second) = clock_parts(instant, timezone);
    let offset_seconds = 60 - i64::from(second);
    let offset_minutes = 60 - (i64::from(minute) + 1);

    let truncated = instant - Duration::nanoseconds(i64::from(instant.timestamp_subsec_nanos()));
    truncated + Duration::seconds(offset_seconds) + Duration::minutes(offset_minutes)
}

/// The instant of the next top-of-hour from "now" in the zone.
pub fn next_top_of_hour(timezone: Timezone) -> DateTime<Utc> {
    next_top_of_hour_at(Utc::now(), timezone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn zone(name: &str) -> Timezone {
        name.parse().unwrap()
    }

    #[test]
    fn timezone_parse() {
        assert_eq!("auto".parse::<Timezone>().unwrap(), Timezone::Auto);
        assert!(matches!(
            "Europe/Berlin".parse::<Timezone>().unwrap(),
            Timezone::Named(_)
        ));
        assert_eq!(
            "Mars/Olympus_Mons".parse::<Timezone>(),
            Err(ScheduleError::UnknownTimezone("Mars/Olympus_Mons".into()))
        );
    }

    #[test]
    fn current_time_renders_in_named_zone() {
        // 13:04:05 UTC is 3:04:05 PM in Berlin (summer, UTC+2)
        let instant = utc(2026, 7, 15, 13, 4, 5);
        assert_eq!(
            current_time_in_zone(instant, zone("Europe/Berlin")),
            "3:04:05 PM"
        );
    }

    #[test]
    fn current_time_handles_half_hour_offset() {
        // 10:00:00 UTC is 3:30:00 PM in Kolkata (UTC+5:30)
        let instant = utc(2026, 1, 10, 10, 0, 0);
        assert_eq!(
            current_time_in_zone(instant, zone("Asia/Kolkata")),
            "3:30:00 PM"
        );
    }

    #[test]
    fn chime_hour_maps_midnight_and_noon_to_twelve() {
        let tz = zone("UTC");
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 0, 0, 0), tz), 12);
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 12, 0, 0), tz), 12);
    }

    #[test]
    fn chime_hour_reduces_modulo_twelve() {
        let tz = zone("UTC");
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 13, 0, 0), tz), 1);
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 23, 0, 0), tz), 11);
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 9, 0, 0), tz), 9);
    }

    #[test]
    fn chime_hour_skews_forward_across_the_boundary() {
        // 11:57 plus the 5-minute skew lands in the 12 o'clock hour
        let tz = zone("UTC");
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 11, 57, 0), tz), 12);
        // but 11:54 does not
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 11, 54, 0), tz), 11);
    }

    #[test]
    fn chime_hour_uses_the_configured_zone() {
        // 18:30 UTC is 12:00 AM in Kolkata with the skew applied (23:55 + 5m)
        let tz = zone("Asia/Kolkata");
        assert_eq!(chime_hour_at(utc(2026, 1, 1, 18, 25, 0), tz), 12);
    }

    #[test]
    fn next_top_of_hour_aligns_mid_hour() {
        let tz = zone("UTC");
        let next = next_top_of_hour_at(utc(2026, 3, 10, 14, 25, 42), tz);
        assert_eq!(next, utc(2026, 3, 10, 15, 0, 0));
    }

    #[test]
    fn next_top_of_hour_on_exact_boundary_is_one_hour_ahead() {
        let tz = zone("UTC");
        let next = next_top_of_hour_at(utc(2026, 3, 10, 14, 0, 0), tz);
        assert_eq!(next, utc(2026, 3, 10, 15, 0, 0));
    }

    #[test]
    fn next_top_of_hour_with_zero_seconds() {
        let tz = zone("UTC");
        let next = next_top_of_hour_at(utc(2026, 3, 10, 14, 59, 0), tz);
        assert_eq!(next, utc(2026, 3, 10, 15, 0, 0));
    }

    #[test]
    fn next_top_of_hour_zeroes_subseconds() {
        let tz = zone("UTC");
        let instant = utc(2026, 3, 10, 14, 25, 42) + Duration::milliseconds(730);
        let next = next_top_of_hour_at(instant, tz);
        assert_eq!(next.timestamp_subsec_nanos(), 0);
        assert_eq!(next, utc(2026, 3, 10, 15, 0, 0));
    }

    #[test]
    fn next_top_of_hour_in_half_hour_offset_zone() {
        // 10:12:30 UTC is 15:42:30 in Kolkata; next top-of-hour there is
        // 16:00:00 IST, which is 10:30:00 UTC.
        let tz = zone("Asia/Kolkata");
        let next = next_top_of_hour_at(utc(2026, 1, 10, 10, 12, 30), tz);
        assert_eq!(next, utc(2026, 1, 10, 10, 30, 0));
    }

    #[test]
    fn next_top_of_hour_rolls_over_midnight() {
        let tz = zone("UTC");
        let next = next_top_of_hour_at(utc(2026, 3, 10, 23, 59, 59), tz);
        assert_eq!(next, utc(2026, 3, 11, 0, 0, 0));
    }
}
