//! Room membership roles and join/leave rules.
//!
//! A room has exactly one active owner at any time (the database backs this
//! with a partial unique index; the checks here give earlier, typed
//! failures). A member's departure is recorded once: `left_at` is set
//! exactly once, after `joined_at`, and the member never becomes active
//! again under the same row.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Role constants
// ---------------------------------------------------------------------------

/// Room creator; schedules development, archives, deletes.
pub const ROLE_OWNER: &str = "owner";
/// Regular participant.
pub const ROLE_MEMBER: &str = "member";

/// All valid member role values, matching the `room_members.role` column.
pub const VALID_MEMBER_ROLES: &[&str] = &[ROLE_OWNER, ROLE_MEMBER];

/// Maximum length for a member nickname.
pub const MAX_NICKNAME_LENGTH: usize = 30;

// ---------------------------------------------------------------------------
// Role enum
// ---------------------------------------------------------------------------

/// A member's role within one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Member,
}

impl MemberRole {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => ROLE_OWNER,
            Self::Member => ROLE_MEMBER,
        }
    }

    /// Parse from a string, returning an error for unknown roles.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_OWNER => Ok(Self::Owner),
            ROLE_MEMBER => Ok(Self::Member),
            other => Err(CoreError::Validation(format!(
                "Unknown member role: '{other}'. Valid roles: {}",
                VALID_MEMBER_ROLES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Member snapshot
// ---------------------------------------------------------------------------

/// Immutable value snapshot of one room membership.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMember {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub role: MemberRole,
    pub nickname: Option<String>,
    pub joined_at: Timestamp,
    pub left_at: Option<Timestamp>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Number of active owners in a membership list.
pub fn active_owner_count(members: &[RoomMember]) -> usize {
    members
        .iter()
        .filter(|m| m.is_active && m.role == MemberRole::Owner)
        .count()
}

/// Validate that `user_id` may join a room with the given existing members
/// in the given role.
pub fn validate_join(
    members: &[RoomMember],
    user_id: DbId,
    role: MemberRole,
    nickname: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(nickname) = nickname {
        if nickname.len() > MAX_NICKNAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Nickname exceeds maximum length of {MAX_NICKNAME_LENGTH} characters"
            )));
        }
    }

    if members.iter().any(|m| m.is_active && m.user_id == user_id) {
        return Err(CoreError::Conflict(format!(
            "User {user_id} is already an active member of this room"
        )));
    }

    if role == MemberRole::Owner && active_owner_count(members) > 0 {
        return Err(CoreError::Conflict(
            "Room already has an active owner".to_string(),
        ));
    }

    Ok(())
}

/// Record a member leaving the room at instant `now`.
///
/// Owners cannot leave: a room must keep its single active owner, so the
/// owner's exit path is archiving or deleting the room instead.
pub fn leave(member: &RoomMember, now: Timestamp) -> Result<RoomMember, CoreError> {
    if member.role == MemberRole::Owner {
        return Err(CoreError::Conflict(
            "The room owner cannot leave; archive or delete the room instead".to_string(),
        ));
    }
    if member.left_at.is_some() || !member.is_active {
        return Err(CoreError::Conflict(format!(
            "Member {} has already left this room",
            member.user_id
        )));
    }
    if now < member.joined_at {
        return Err(CoreError::Validation(
            "Departure instant precedes the join instant".to_string(),
        ));
    }

    let mut member = member.clone();
    member.left_at = Some(now);
    member.is_active = false;
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn member(id: DbId, user_id: DbId, role: MemberRole) -> RoomMember {
        RoomMember {
            id,
            room_id: 1,
            user_id,
            role,
            nickname: None,
            joined_at: utc(2025, 7, 1, 9, 0),
            left_at: None,
            is_active: true,
        }
    }

    #[test]
    fn one_active_owner_is_counted() {
        let members = vec![
            member(1, 10, MemberRole::Owner),
            member(2, 11, MemberRole::Member),
        ];
        assert_eq!(active_owner_count(&members), 1);
    }

    #[test]
    fn departed_owner_is_not_counted() {
        let mut owner = member(1, 10, MemberRole::Owner);
        owner.is_active = false;
        owner.left_at = Some(utc(2025, 7, 2, 9, 0));
        assert_eq!(active_owner_count(&[owner]), 0);
    }

    #[test]
    fn second_owner_rejected() {
        let members = vec![member(1, 10, MemberRole::Owner)];
        let err = validate_join(&members, 11, MemberRole::Owner, None).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn duplicate_active_member_rejected() {
        let members = vec![member(1, 10, MemberRole::Owner)];
        let err = validate_join(&members, 10, MemberRole::Member, None).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn rejoining_after_leaving_is_allowed() {
        let mut old = member(1, 11, MemberRole::Member);
        old.is_active = false;
        old.left_at = Some(utc(2025, 7, 2, 9, 0));
        assert!(validate_join(&[old], 11, MemberRole::Member, Some("Ann")).is_ok());
    }

    #[test]
    fn leave_sets_departure_exactly_once() {
        let m = member(2, 11, MemberRole::Member);
        let departed = leave(&m, utc(2025, 7, 2, 9, 0)).unwrap();
        assert_eq!(departed.left_at, Some(utc(2025, 7, 2, 9, 0)));
        assert!(!departed.is_active);

        let err = leave(&departed, utc(2025, 7, 3, 9, 0)).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn leave_before_join_rejected() {
        let m = member(2, 11, MemberRole::Member);
        let err = leave(&m, utc(2025, 6, 30, 9, 0)).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn owner_cannot_leave() {
        let owner = member(1, 10, MemberRole::Owner);
        let err = leave(&owner, utc(2025, 7, 2, 9, 0)).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }
}
