//! Room-local wall-clock helpers.
//!
//! Rooms carry a fixed UTC offset in minutes, captured from the creating
//! client. Date boundaries (start of trip, end of trip, calendar-day quota
//! windows) and the 09:00 next-morning development rule are all evaluated
//! against that offset. The arithmetic is plain offset addition, which keeps
//! every helper total: no DST transitions, no ambiguous local times.

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::types::Timestamp;

/// Largest accepted offset magnitude: UTC+14 / UTC-14 covers every real zone.
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

/// Convert a UTC instant to the room-local wall clock.
pub fn to_local(now: Timestamp, tz_offset_minutes: i32) -> NaiveDateTime {
    (now + Duration::minutes(i64::from(tz_offset_minutes))).naive_utc()
}

/// The room-local calendar date of a UTC instant.
pub fn local_date(now: Timestamp, tz_offset_minutes: i32) -> NaiveDate {
    to_local(now, tz_offset_minutes).date()
}

/// Convert a room-local wall-clock time back to a UTC instant.
pub fn from_local(local: NaiveDateTime, tz_offset_minutes: i32) -> Timestamp {
    Utc.from_utc_datetime(&(local - Duration::minutes(i64::from(tz_offset_minutes))))
}

/// Whether an offset is within the accepted ±14h range.
pub fn offset_in_range(tz_offset_minutes: i32) -> bool {
    tz_offset_minutes.abs() <= MAX_TZ_OFFSET_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn zero_offset_is_identity() {
        let now = utc(2025, 7, 1, 12, 30);
        assert_eq!(to_local(now, 0), now.naive_utc());
        assert_eq!(from_local(now.naive_utc(), 0), now);
    }

    #[test]
    fn positive_offset_advances_local_date() {
        // 23:30 UTC is already the next day at UTC+2.
        let now = utc(2025, 7, 1, 23, 30);
        assert_eq!(
            local_date(now, 120),
            NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()
        );
    }

    #[test]
    fn negative_offset_lags_local_date() {
        // 00:30 UTC is still the previous day at UTC-5.
        let now = utc(2025, 7, 2, 0, 30);
        assert_eq!(
            local_date(now, -300),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
    }

    #[test]
    fn local_round_trip() {
        let now = utc(2025, 7, 1, 9, 0);
        for offset in [-300, 0, 120, 330, 840] {
            assert_eq!(from_local(to_local(now, offset), offset), now);
        }
    }

    #[test]
    fn offset_range_bounds() {
        assert!(offset_in_range(0));
        assert!(offset_in_range(840));
        assert!(offset_in_range(-840));
        assert!(!offset_in_range(841));
        assert!(!offset_in_range(-841));
    }
}
