//! Room lifecycle state machine and development scheduling.
//!
//! A room moves one-directionally through
//! `upcoming -> active -> pending_development -> developed`, driven purely by
//! the clock, with `archived` and `deleted` reachable from any non-deleted
//! state by explicit action. [`evaluate`] is the single entry point for
//! time-driven transitions: it is pure, total, and idempotent for
//! non-decreasing `now`, so it can be called from a sweeper tick, a
//! foreground refresh, or a capture authorization without coordination.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::CoreError;
use crate::localtime;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Created, trip has not started yet.
pub const ROOM_STATUS_UPCOMING: &str = "upcoming";
/// Trip in progress; the only state in which photos may be captured.
pub const ROOM_STATUS_ACTIVE: &str = "active";
/// Trip over, photos hidden until the development schedule fires.
pub const ROOM_STATUS_PENDING_DEVELOPMENT: &str = "pending_development";
/// Photos revealed.
pub const ROOM_STATUS_DEVELOPED: &str = "developed";
/// Retired by owner action or retention policy.
pub const ROOM_STATUS_ARCHIVED: &str = "archived";
/// Soft-deleted; rows are retained for audit but invisible to normal queries.
pub const ROOM_STATUS_DELETED: &str = "deleted";

/// All valid room status values, matching the `rooms.status` column.
pub const VALID_ROOM_STATUSES: &[&str] = &[
    ROOM_STATUS_UPCOMING,
    ROOM_STATUS_ACTIVE,
    ROOM_STATUS_PENDING_DEVELOPMENT,
    ROOM_STATUS_DEVELOPED,
    ROOM_STATUS_ARCHIVED,
    ROOM_STATUS_DELETED,
];

// ---------------------------------------------------------------------------
// Development type constants
// ---------------------------------------------------------------------------

/// Develop at 09:00 room-local on the morning after the trip ends.
pub const DEVELOPMENT_NEXT_MORNING: &str = "next_morning";
/// Develop the moment the trip ends.
pub const DEVELOPMENT_IMMEDIATE: &str = "immediate";
/// Develop at a caller-chosen instant.
pub const DEVELOPMENT_CUSTOM: &str = "custom";

/// All valid development type values.
pub const VALID_DEVELOPMENT_TYPES: &[&str] = &[
    DEVELOPMENT_NEXT_MORNING,
    DEVELOPMENT_IMMEDIATE,
    DEVELOPMENT_CUSTOM,
];

/// Room-local hour at which next-morning development fires.
pub const DEVELOPMENT_HOUR: u32 = 9;

// ---------------------------------------------------------------------------
// Validation limits
// ---------------------------------------------------------------------------

/// Maximum length for a room name.
pub const MAX_ROOM_NAME_LENGTH: usize = 60;

/// Maximum length for a destination label.
pub const MAX_DESTINATION_LENGTH: usize = 120;

/// Maximum length for an icon glyph (a short emoji sequence).
pub const MAX_ICON_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Room lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Upcoming,
    Active,
    PendingDevelopment,
    Developed,
    Archived,
    Deleted,
}

impl RoomStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => ROOM_STATUS_UPCOMING,
            Self::Active => ROOM_STATUS_ACTIVE,
            Self::PendingDevelopment => ROOM_STATUS_PENDING_DEVELOPMENT,
            Self::Developed => ROOM_STATUS_DEVELOPED,
            Self::Archived => ROOM_STATUS_ARCHIVED,
            Self::Deleted => ROOM_STATUS_DELETED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            ROOM_STATUS_UPCOMING => Ok(Self::Upcoming),
            ROOM_STATUS_ACTIVE => Ok(Self::Active),
            ROOM_STATUS_PENDING_DEVELOPMENT => Ok(Self::PendingDevelopment),
            ROOM_STATUS_DEVELOPED => Ok(Self::Developed),
            ROOM_STATUS_ARCHIVED => Ok(Self::Archived),
            ROOM_STATUS_DELETED => Ok(Self::Deleted),
            other => Err(CoreError::Validation(format!(
                "Unknown room status: '{other}'. Valid statuses: {}",
                VALID_ROOM_STATUSES.join(", ")
            ))),
        }
    }

    /// Terminal statuses accept no further time-driven transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived | Self::Deleted)
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a room's photos are revealed after the trip ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentType {
    NextMorning,
    Immediate,
    Custom,
}

impl DevelopmentType {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextMorning => DEVELOPMENT_NEXT_MORNING,
            Self::Immediate => DEVELOPMENT_IMMEDIATE,
            Self::Custom => DEVELOPMENT_CUSTOM,
        }
    }

    /// Parse from a string, returning an error for unknown types.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            DEVELOPMENT_NEXT_MORNING => Ok(Self::NextMorning),
            DEVELOPMENT_IMMEDIATE => Ok(Self::Immediate),
            DEVELOPMENT_CUSTOM => Ok(Self::Custom),
            other => Err(CoreError::Validation(format!(
                "Unknown development type: '{other}'. Valid types: {}",
                VALID_DEVELOPMENT_TYPES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for DevelopmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of valid target statuses reachable from `from`.
///
/// `deleted` returns an empty slice: nothing leaves it. `archived` can
/// still be deleted (audit cleanup), but accepts no other transition.
pub fn valid_transitions(from: RoomStatus) -> &'static [RoomStatus] {
    use RoomStatus::*;
    match from {
        Upcoming => &[Active, Archived, Deleted],
        Active => &[PendingDevelopment, Archived, Deleted],
        PendingDevelopment => &[Developed, Archived, Deleted],
        Developed => &[Archived, Deleted],
        Archived => &[Deleted],
        Deleted => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: RoomStatus, to: RoomStatus) -> bool {
    valid_transitions(from).contains(&to)
}

// ---------------------------------------------------------------------------
// Room snapshot
// ---------------------------------------------------------------------------

/// Immutable value snapshot of a room, as loaded from persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: DbId,
    pub name: String,
    pub destination: Option<String>,
    pub icon: String,
    /// First trip day (room-local calendar date).
    pub start_date: NaiveDate,
    /// Last trip day (room-local calendar date, inclusive).
    pub end_date: NaiveDate,
    pub status: RoomStatus,
    pub development_type: DevelopmentType,
    /// Fixed once the room enters `pending_development`; the authorization
    /// point for the reveal.
    pub development_scheduled_at: Option<Timestamp>,
    /// Audit record of when the reveal actually fired; may lag the schedule.
    pub developed_at: Option<Timestamp>,
    /// Room-local wall clock as minutes east of UTC.
    pub tz_offset_minutes: i32,
    pub photo_count: i32,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Time-driven evaluation
// ---------------------------------------------------------------------------

/// Advance a room as far as the lifecycle rules allow at instant `now`.
///
/// Applies chained transitions in one call (a room evaluated long after its
/// dates can move `upcoming` straight through to `developed`). Never
/// regresses, never fails: terminal rooms come back unchanged. Repeated
/// calls with the same or a later `now` yield the same or a further-advanced
/// status, never a different outcome for the same instant.
pub fn evaluate(room: &Room, now: Timestamp) -> Room {
    let mut room = room.clone();

    loop {
        let next = match room.status {
            RoomStatus::Upcoming
                if localtime::local_date(now, room.tz_offset_minutes) >= room.start_date =>
            {
                Some(RoomStatus::Active)
            }
            RoomStatus::Active
                if localtime::local_date(now, room.tz_offset_minutes) > room.end_date =>
            {
                room.development_scheduled_at = Some(resolve_development_schedule(&room, now));
                Some(RoomStatus::PendingDevelopment)
            }
            RoomStatus::PendingDevelopment => {
                let scheduled_at = match room.development_scheduled_at {
                    Some(at) => at,
                    // A persisted room can predate its schedule being fixed;
                    // resolve it now so the reveal still fires.
                    None => {
                        let at = resolve_development_schedule(&room, now);
                        room.development_scheduled_at = Some(at);
                        at
                    }
                };
                if now >= scheduled_at {
                    room.developed_at = Some(now);
                    Some(RoomStatus::Developed)
                } else {
                    None
                }
            }
            _ => None,
        };

        match next {
            Some(status) => room.status = status,
            None => break,
        }
    }

    room
}

/// True only while the room is `active`, the sole state in which photo
/// capture may be authorized.
pub fn can_capture_photo(room: &Room) -> bool {
    room.status == RoomStatus::Active
}

/// The instant a room entering `pending_development` should develop at.
///
/// `custom` keeps the caller-supplied instant when present; the fallbacks
/// degrade to the entry instant so the reveal can never be lost.
fn resolve_development_schedule(room: &Room, entered_at: Timestamp) -> Timestamp {
    match room.development_type {
        DevelopmentType::NextMorning => {
            next_morning(room.end_date, room.tz_offset_minutes).unwrap_or(entered_at)
        }
        DevelopmentType::Immediate => entered_at,
        DevelopmentType::Custom => room.development_scheduled_at.unwrap_or(entered_at),
    }
}

/// 09:00 room-local on the day after `end_date`, as a UTC instant.
///
/// `None` only at the far edge of the calendar range.
fn next_morning(end_date: NaiveDate, tz_offset_minutes: i32) -> Option<Timestamp> {
    let morning = NaiveTime::from_hms_opt(DEVELOPMENT_HOUR, 0, 0)?;
    let local: NaiveDateTime = end_date.succ_opt()?.and_time(morning);
    Some(localtime::from_local(local, tz_offset_minutes))
}

// ---------------------------------------------------------------------------
// Explicit mutations
// ---------------------------------------------------------------------------

/// Choose how and when the room will develop.
///
/// Legal only while the room is `active` or `pending_development`. Sets the
/// development type and (for `next_morning` and `custom`) the schedule; the
/// status itself still advances only through [`evaluate`]. A `custom`
/// instant whose room-local date precedes the room's end date fails with
/// [`CoreError::InvalidSchedule`].
pub fn request_development(
    room: &Room,
    development_type: DevelopmentType,
    custom_instant: Option<Timestamp>,
) -> Result<Room, CoreError> {
    if room.status.is_terminal() {
        return Err(CoreError::TerminalState {
            room_id: room.id,
            status: room.status,
        });
    }
    if !matches!(
        room.status,
        RoomStatus::Active | RoomStatus::PendingDevelopment
    ) {
        return Err(CoreError::Conflict(format!(
            "Development can only be scheduled for an active or pending room, not {}",
            room.status
        )));
    }

    let mut room = room.clone();
    room.development_type = development_type;
    room.development_scheduled_at = match development_type {
        DevelopmentType::NextMorning => next_morning(room.end_date, room.tz_offset_minutes),
        // Resolved at the pending_development transition.
        DevelopmentType::Immediate => None,
        DevelopmentType::Custom => {
            let instant = custom_instant.ok_or_else(|| {
                CoreError::InvalidSchedule(
                    "Custom development requires an explicit instant".to_string(),
                )
            })?;
            let instant_date = localtime::local_date(instant, room.tz_offset_minutes);
            if instant_date < room.end_date {
                return Err(CoreError::InvalidSchedule(format!(
                    "Custom development instant falls on {instant_date}, before the room ends on {}",
                    room.end_date
                )));
            }
            Some(instant)
        }
    };

    Ok(room)
}

/// Soft-delete a room. Legal from any status except `deleted`.
pub fn delete(room: &Room) -> Result<Room, CoreError> {
    if room.status == RoomStatus::Deleted {
        return Err(CoreError::TerminalState {
            room_id: room.id,
            status: room.status,
        });
    }
    let mut room = room.clone();
    room.status = RoomStatus::Deleted;
    Ok(room)
}

/// Archive a room. Legal from any status except `deleted`; archiving an
/// already-archived room is a no-op.
pub fn archive(room: &Room) -> Result<Room, CoreError> {
    if room.status == RoomStatus::Deleted {
        return Err(CoreError::TerminalState {
            room_id: room.id,
            status: room.status,
        });
    }
    let mut room = room.clone();
    room.status = RoomStatus::Archived;
    Ok(room)
}

// ---------------------------------------------------------------------------
// Creation validation
// ---------------------------------------------------------------------------

/// Validate the caller-supplied fields of a new room.
pub fn validate_new_room(
    name: &str,
    destination: Option<&str>,
    icon: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    tz_offset_minutes: i32,
) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Room name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_ROOM_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Room name exceeds maximum length of {MAX_ROOM_NAME_LENGTH} characters"
        )));
    }

    if let Some(destination) = destination {
        if destination.len() > MAX_DESTINATION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Destination exceeds maximum length of {MAX_DESTINATION_LENGTH} characters"
            )));
        }
    }

    if icon.trim().is_empty() || icon.len() > MAX_ICON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Icon must be a glyph of at most {MAX_ICON_LENGTH} bytes"
        )));
    }

    if start_date > end_date {
        return Err(CoreError::Validation(format!(
            "Room start date {start_date} is after end date {end_date}"
        )));
    }

    if !localtime::offset_in_range(tz_offset_minutes) {
        return Err(CoreError::Validation(format!(
            "Timezone offset {tz_offset_minutes} minutes is outside the accepted range"
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    /// A July 1-3 room, next-morning development, UTC wall clock.
    fn july_room() -> Room {
        Room {
            id: 1,
            name: "Kyoto".to_string(),
            destination: Some("Japan".to_string()),
            icon: "\u{1F5FC}".to_string(),
            start_date: date(2025, 7, 1),
            end_date: date(2025, 7, 3),
            status: RoomStatus::Upcoming,
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

    // -----------------------------------------------------------------------
    // Transition table
    // -----------------------------------------------------------------------

    #[test]
    fn upcoming_reaches_active_and_terminals_only() {
        assert!(can_transition(RoomStatus::Upcoming, RoomStatus::Active));
        assert!(can_transition(RoomStatus::Upcoming, RoomStatus::Archived));
        assert!(can_transition(RoomStatus::Upcoming, RoomStatus::Deleted));
        assert!(!can_transition(
            RoomStatus::Upcoming,
            RoomStatus::PendingDevelopment
        ));
        assert!(!can_transition(RoomStatus::Upcoming, RoomStatus::Developed));
    }

    #[test]
    fn no_transition_regresses() {
        assert!(!can_transition(RoomStatus::Active, RoomStatus::Upcoming));
        assert!(!can_transition(
            RoomStatus::PendingDevelopment,
            RoomStatus::Active
        ));
        assert!(!can_transition(
            RoomStatus::Developed,
            RoomStatus::PendingDevelopment
        ));
    }

    #[test]
    fn deleted_has_no_transitions() {
        assert!(valid_transitions(RoomStatus::Deleted).is_empty());
    }

    #[test]
    fn archived_can_only_be_deleted() {
        assert_eq!(
            valid_transitions(RoomStatus::Archived),
            &[RoomStatus::Deleted]
        );
    }

    // -----------------------------------------------------------------------
    // evaluate: time-driven transitions
    // -----------------------------------------------------------------------

    #[test]
    fn before_start_date_stays_upcoming() {
        let room = evaluate(&july_room(), utc(2025, 6, 30, 23, 59));
        assert_eq!(room.status, RoomStatus::Upcoming);
    }

    #[test]
    fn start_of_start_date_activates() {
        let room = evaluate(&july_room(), utc(2025, 7, 1, 0, 0));
        assert_eq!(room.status, RoomStatus::Active);
    }

    #[test]
    fn last_day_is_still_active() {
        let room = evaluate(&july_room(), utc(2025, 7, 3, 23, 59));
        assert_eq!(room.status, RoomStatus::Active);
    }

    #[test]
    fn past_end_date_is_pending_development() {
        let room = evaluate(&july_room(), utc(2025, 7, 4, 0, 0));
        assert_eq!(room.status, RoomStatus::PendingDevelopment);
        assert_eq!(
            room.development_scheduled_at,
            Some(utc(2025, 7, 4, 9, 0)),
            "next-morning schedule is 09:00 on the day after the end date"
        );
        assert_eq!(room.developed_at, None);
    }

    #[test]
    fn next_morning_develops_at_nine_local() {
        let room = evaluate(&july_room(), utc(2025, 7, 4, 9, 0));
        assert_eq!(room.status, RoomStatus::Developed);
        assert_eq!(room.development_scheduled_at, Some(utc(2025, 7, 4, 9, 0)));
        assert_eq!(room.developed_at, Some(utc(2025, 7, 4, 9, 0)));
    }

    #[test]
    fn next_morning_respects_room_offset() {
        let mut room = july_room();
        room.tz_offset_minutes = 120; // UTC+2
        let evaluated = evaluate(&room, utc(2025, 7, 4, 7, 0));
        assert_eq!(evaluated.status, RoomStatus::Developed);
        // 09:00 local at UTC+2 is 07:00 UTC.
        assert_eq!(
            evaluated.development_scheduled_at,
            Some(utc(2025, 7, 4, 7, 0))
        );
    }

    #[test]
    fn late_evaluation_chains_from_upcoming_to_developed() {
        let room = evaluate(&july_room(), utc(2025, 8, 1, 12, 0));
        assert_eq!(room.status, RoomStatus::Developed);
        assert_eq!(room.development_scheduled_at, Some(utc(2025, 7, 4, 9, 0)));
        // The audit stamp records when the reveal actually fired.
        assert_eq!(room.developed_at, Some(utc(2025, 8, 1, 12, 0)));
    }

    #[test]
    fn immediate_develops_on_entering_pending() {
        let mut room = july_room();
        room.development_type = DevelopmentType::Immediate;
        let now = utc(2025, 7, 4, 3, 0);
        let evaluated = evaluate(&room, now);
        assert_eq!(evaluated.status, RoomStatus::Developed);
        assert_eq!(evaluated.development_scheduled_at, Some(now));
        assert_eq!(evaluated.developed_at, Some(now));
    }

    #[test]
    fn custom_schedule_holds_until_its_instant() {
        let mut room = july_room();
        room.status = RoomStatus::Active;
        let room =
            request_development(&room, DevelopmentType::Custom, Some(utc(2025, 7, 6, 18, 0)))
                .unwrap();

        let pending = evaluate(&room, utc(2025, 7, 5, 12, 0));
        assert_eq!(pending.status, RoomStatus::PendingDevelopment);
        assert_eq!(
            pending.development_scheduled_at,
            Some(utc(2025, 7, 6, 18, 0))
        );

        let developed = evaluate(&room, utc(2025, 7, 6, 18, 0));
        assert_eq!(developed.status, RoomStatus::Developed);
    }

    #[test]
    fn terminal_rooms_are_unchanged() {
        for status in [RoomStatus::Archived, RoomStatus::Deleted] {
            let mut room = july_room();
            room.status = status;
            let evaluated = evaluate(&room, utc(2026, 1, 1, 0, 0));
            assert_eq!(evaluated, room);
        }
    }

    #[test]
    fn evaluate_is_idempotent_and_chainable() {
        let room = july_room();
        let instants = [
            utc(2025, 6, 30, 12, 0),
            utc(2025, 7, 1, 0, 0),
            utc(2025, 7, 3, 23, 0),
            utc(2025, 7, 4, 0, 30),
            utc(2025, 7, 4, 9, 0),
            utc(2025, 9, 1, 0, 0),
        ];
        for (i, now1) in instants.iter().enumerate() {
            for now2 in &instants[i..] {
                let stepped = evaluate(&evaluate(&room, *now1), *now2);
                let direct = evaluate(&room, *now2);
                assert_eq!(stepped.status, direct.status, "now1={now1} now2={now2}");
            }
        }
    }

    #[test]
    fn status_never_regresses_over_time() {
        let room = july_room();
        let mut current = room.clone();
        let mut reached = Vec::new();
        for now in [
            utc(2025, 7, 1, 8, 0),
            utc(2025, 7, 2, 8, 0),
            utc(2025, 7, 4, 1, 0),
            utc(2025, 7, 4, 10, 0),
            utc(2025, 7, 10, 10, 0),
        ] {
            current = evaluate(&current, now);
            reached.push(current.status);
        }
        assert_eq!(
            reached,
            vec![
                RoomStatus::Active,
                RoomStatus::Active,
                RoomStatus::PendingDevelopment,
                RoomStatus::Developed,
                RoomStatus::Developed,
            ]
        );
    }

    // -----------------------------------------------------------------------
    // Capture gate
    // -----------------------------------------------------------------------

    #[test]
    fn capture_allowed_only_while_active() {
        let mut room = july_room();
        for status in [
            RoomStatus::Upcoming,
            RoomStatus::Active,
            RoomStatus::PendingDevelopment,
            RoomStatus::Developed,
            RoomStatus::Archived,
            RoomStatus::Deleted,
        ] {
            room.status = status;
            assert_eq!(can_capture_photo(&room), status == RoomStatus::Active);
        }
    }

    // -----------------------------------------------------------------------
    // request_development
    // -----------------------------------------------------------------------

    #[test]
    fn custom_instant_before_end_date_rejected() {
        let mut room = july_room();
        room.status = RoomStatus::Active;
        let err =
            request_development(&room, DevelopmentType::Custom, Some(utc(2025, 7, 2, 12, 0)))
                .unwrap_err();
        assert_matches!(err, CoreError::InvalidSchedule(_));
    }

    #[test]
    fn custom_instant_requires_value() {
        let mut room = july_room();
        room.status = RoomStatus::Active;
        let err = request_development(&room, DevelopmentType::Custom, None).unwrap_err();
        assert_matches!(err, CoreError::InvalidSchedule(_));
    }

    #[test]
    fn custom_instant_on_end_date_accepted() {
        let mut room = july_room();
        room.status = RoomStatus::Active;
        let room =
            request_development(&room, DevelopmentType::Custom, Some(utc(2025, 7, 3, 20, 0)))
                .unwrap();
        assert_eq!(
            room.development_scheduled_at,
            Some(utc(2025, 7, 3, 20, 0))
        );
        // Status never changes through a development request.
        assert_eq!(room.status, RoomStatus::Active);
    }

    #[test]
    fn development_request_illegal_before_trip() {
        let room = july_room();
        let err = request_development(&room, DevelopmentType::Immediate, None).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn development_request_illegal_on_deleted_room() {
        let mut room = july_room();
        room.status = RoomStatus::Deleted;
        let err = request_development(&room, DevelopmentType::Immediate, None).unwrap_err();
        assert_matches!(err, CoreError::TerminalState { .. });
    }

    // -----------------------------------------------------------------------
    // delete / archive
    // -----------------------------------------------------------------------

    #[test]
    fn delete_is_legal_from_any_live_status() {
        for status in [
            RoomStatus::Upcoming,
            RoomStatus::Active,
            RoomStatus::PendingDevelopment,
            RoomStatus::Developed,
            RoomStatus::Archived,
        ] {
            let mut room = july_room();
            room.status = status;
            assert_eq!(delete(&room).unwrap().status, RoomStatus::Deleted);
        }
    }

    #[test]
    fn delete_of_deleted_room_fails() {
        let mut room = july_room();
        room.status = RoomStatus::Deleted;
        assert_matches!(delete(&room).unwrap_err(), CoreError::TerminalState { .. });
    }

    #[test]
    fn archive_of_deleted_room_fails() {
        let mut room = july_room();
        room.status = RoomStatus::Deleted;
        assert_matches!(archive(&room).unwrap_err(), CoreError::TerminalState { .. });
    }

    #[test]
    fn archive_is_idempotent() {
        let mut room = july_room();
        room.status = RoomStatus::Archived;
        assert_eq!(archive(&room).unwrap().status, RoomStatus::Archived);
    }

    // -----------------------------------------------------------------------
    // Creation validation
    // -----------------------------------------------------------------------

    #[test]
    fn valid_room_fields_accepted() {
        assert!(validate_new_room(
            "Kyoto",
            Some("Japan"),
            "\u{1F5FC}",
            date(2025, 7, 1),
            date(2025, 7, 3),
            540
        )
        .is_ok());
    }

    #[test]
    fn reversed_dates_rejected() {
        let err = validate_new_room(
            "Kyoto",
            None,
            "\u{1F5FC}",
            date(2025, 7, 3),
            date(2025, 7, 1),
            0,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn single_day_room_accepted() {
        assert!(validate_new_room(
            "Day trip",
            None,
            "\u{1F3D5}",
            date(2025, 7, 1),
            date(2025, 7, 1),
            0
        )
        .is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let err = validate_new_room(
            "   ",
            None,
            "\u{1F5FC}",
            date(2025, 7, 1),
            date(2025, 7, 3),
            0,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn oversized_offset_rejected() {
        let err = validate_new_room(
            "Kyoto",
            None,
            "\u{1F5FC}",
            date(2025, 7, 1),
            date(2025, 7, 3),
            900,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }
}
