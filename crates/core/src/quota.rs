//! Per-plan photo capture quotas.
//!
//! Guests spend a fixed budget over a room's whole lifetime; free and
//! premium users get a budget per room-local calendar day. A capture
//! consumes one unit whatever moderation later decides; only a `returned`
//! photo hands its unit back, so returned photos are excluded from every
//! counting window here.
//!
//! These functions are pure: the caller supplies the uploader's existing
//! photos for the room and the current instant. Making the
//! count-then-authorize-then-insert sequence atomic is the persistence
//! layer's job.

use serde::Serialize;

use crate::error::CoreError;
use crate::localtime;
use crate::photo_status::{Photo, PhotoStatus};
use crate::plan::{Plan, GUEST_ROOM_PHOTO_LIMIT};
use crate::room_lifecycle::{self, Room};
use crate::types::Timestamp;

/// A user's remaining capture budget for one room, derived on demand and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoLimit {
    /// Units left in the current counting window.
    pub remaining: u32,
    /// Size of the window's budget.
    pub limit: u32,
    /// Whether the guest (room-lifetime) rule produced this limit.
    pub is_guest: bool,
}

impl PhotoLimit {
    /// Whether one more capture may be authorized.
    pub fn can_take_photo(&self) -> bool {
        self.remaining > 0
    }
}

/// Compute a user's remaining photo budget for a room.
///
/// `existing` must be the uploader's photos in this room, any status; the
/// window and the returned-photo exclusion are applied here.
pub fn photo_limit(
    plan: Plan,
    existing: &[Photo],
    now: Timestamp,
    tz_offset_minutes: i32,
) -> PhotoLimit {
    let limit = if plan.is_guest() {
        GUEST_ROOM_PHOTO_LIMIT
    } else {
        plan.daily_photo_limit()
    };

    let today = localtime::local_date(now, tz_offset_minutes);
    let used = existing
        .iter()
        .filter(|photo| photo.status != PhotoStatus::Returned)
        .filter(|photo| {
            // Guests count forever; paid tiers only within the local day.
            plan.is_guest() || localtime::local_date(photo.taken_at, tz_offset_minutes) == today
        })
        .count() as u32;

    PhotoLimit {
        remaining: limit.saturating_sub(used),
        limit,
        is_guest: plan.is_guest(),
    }
}

/// Authorize one photo capture against the room state and the plan quota.
///
/// Fails with [`CoreError::RoomNotActive`] outside the room's active window
/// and [`CoreError::QuotaExceeded`] when the budget is spent. Must be called
/// before the photo is persisted.
pub fn authorize_capture(
    plan: Plan,
    room: &Room,
    existing: &[Photo],
    now: Timestamp,
) -> Result<(), CoreError> {
    if !room_lifecycle::can_capture_photo(room) {
        return Err(CoreError::RoomNotActive {
            room_id: room.id,
            status: room.status,
        });
    }

    let limit = photo_limit(plan, existing, now, room.tz_offset_minutes);
    if !limit.can_take_photo() {
        return Err(CoreError::QuotaExceeded {
            is_guest: limit.is_guest,
            limit: limit.limit,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_lifecycle::{DevelopmentType, RoomStatus};
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn active_room() -> Room {
        Room {
            id: 1,
            name: "Kyoto".to_string(),
            destination: None,
            icon: "\u{1F5FC}".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
            status: RoomStatus::Active,
            development_type: DevelopmentType::NextMorning,
            development_scheduled_at: None,
            developed_at: None,
            tz_offset_minutes: 0,
            photo_count: 0,
            owner_id: 10,
            created_at: utc(2025, 6, 20, 12, 0),
            updated_at: utc(2025, 6, 20, 12, 0),
        }
    }

    fn photo_taken_at(taken_at: Timestamp, status: PhotoStatus) -> Photo {
        Photo {
            id: 0,
            room_id: 1,
            user_id: 10,
            status,
            rejection_reason: None,
            filter_id: None,
            date_stamped: false,
            visible: true,
            taken_at,
            expires_at: None,
            created_at: taken_at,
        }
    }

    fn photos_at(taken_at: Timestamp, count: usize) -> Vec<Photo> {
        (0..count)
            .map(|_| photo_taken_at(taken_at, PhotoStatus::Approved))
            .collect()
    }

    #[test]
    fn guest_budget_spans_the_whole_room() {
        let now = utc(2025, 7, 5, 12, 0);
        // Five photos spread over four days: the guest budget is gone.
        let mut existing = photos_at(utc(2025, 7, 1, 10, 0), 2);
        existing.extend(photos_at(utc(2025, 7, 2, 10, 0), 1));
        existing.extend(photos_at(utc(2025, 7, 4, 10, 0), 2));

        let limit = photo_limit(Plan::Guest, &existing, now, 0);
        assert_eq!(limit.limit, 5);
        assert_eq!(limit.remaining, 0);
        assert!(limit.is_guest);
        assert!(!limit.can_take_photo());
    }

    #[test]
    fn guest_with_budget_left_can_capture() {
        let now = utc(2025, 7, 5, 12, 0);
        let existing = photos_at(utc(2025, 7, 1, 10, 0), 4);
        let limit = photo_limit(Plan::Guest, &existing, now, 0);
        assert_eq!(limit.remaining, 1);
        assert!(limit.can_take_photo());
    }

    #[test]
    fn free_window_resets_each_local_day() {
        let now = utc(2025, 7, 5, 12, 0);
        // 23 today, 1000 yesterday: only today's count against the limit.
        let mut existing = photos_at(utc(2025, 7, 5, 8, 0), 23);
        existing.extend(photos_at(utc(2025, 7, 4, 8, 0), 1000));

        let limit = photo_limit(Plan::Free, &existing, now, 0);
        assert_eq!(limit.limit, 24);
        assert_eq!(limit.remaining, 1);
        assert!(!limit.is_guest);
    }

    #[test]
    fn premium_daily_budget_is_larger() {
        let now = utc(2025, 7, 5, 12, 0);
        let existing = photos_at(utc(2025, 7, 5, 8, 0), 36);
        let limit = photo_limit(Plan::Premium, &existing, now, 0);
        assert_eq!(limit.limit, 36);
        assert_eq!(limit.remaining, 0);
    }

    #[test]
    fn returned_photos_free_their_unit() {
        let now = utc(2025, 7, 5, 12, 0);
        let mut existing = photos_at(utc(2025, 7, 1, 10, 0), 5);
        existing[0].status = PhotoStatus::Returned;

        let limit = photo_limit(Plan::Guest, &existing, now, 0);
        assert_eq!(limit.remaining, 1);
    }

    #[test]
    fn rejected_photos_still_consume_quota() {
        let now = utc(2025, 7, 5, 12, 0);
        let mut existing = photos_at(utc(2025, 7, 5, 8, 0), 24);
        for photo in existing.iter_mut().take(6) {
            photo.status = PhotoStatus::Rejected;
        }
        let limit = photo_limit(Plan::Free, &existing, now, 0);
        assert_eq!(limit.remaining, 0);
    }

    #[test]
    fn daily_window_follows_the_room_clock() {
        // 23:00 UTC on July 4th is already July 5th at UTC+2, so photos
        // taken then do not count against a July 4th (UTC+2) morning.
        let existing = photos_at(utc(2025, 7, 4, 23, 0), 24);
        let now = utc(2025, 7, 4, 8, 0);
        let limit = photo_limit(Plan::Free, &existing, now, 120);
        assert_eq!(limit.remaining, 24);
    }

    #[test]
    fn capture_authorized_with_quota_left() {
        let room = active_room();
        let existing = photos_at(utc(2025, 7, 5, 8, 0), 3);
        assert!(authorize_capture(Plan::Free, &room, &existing, utc(2025, 7, 5, 12, 0)).is_ok());
    }

    #[test]
    fn exhausted_guest_gets_guest_flagged_error() {
        let room = active_room();
        let existing = photos_at(utc(2025, 7, 1, 10, 0), 5);
        let err =
            authorize_capture(Plan::Guest, &room, &existing, utc(2025, 7, 5, 12, 0)).unwrap_err();
        assert_matches!(
            err,
            CoreError::QuotaExceeded {
                is_guest: true,
                limit: 5
            }
        );
    }

    #[test]
    fn exhausted_free_user_is_not_guest_flagged() {
        let room = active_room();
        let existing = photos_at(utc(2025, 7, 5, 8, 0), 24);
        let err =
            authorize_capture(Plan::Free, &room, &existing, utc(2025, 7, 5, 12, 0)).unwrap_err();
        assert_matches!(
            err,
            CoreError::QuotaExceeded {
                is_guest: false,
                limit: 24
            }
        );
    }

    #[test]
    fn capture_outside_active_room_rejected_before_quota() {
        let mut room = active_room();
        room.status = RoomStatus::PendingDevelopment;
        // Even with a full budget the room state wins.
        let err = authorize_capture(Plan::Premium, &room, &[], utc(2025, 7, 11, 9, 0)).unwrap_err();
        assert_matches!(err, CoreError::RoomNotActive { .. });
    }
}
