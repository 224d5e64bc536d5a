//! Photo moderation status machine.
//!
//! Every captured photo starts `pending`. The external moderation
//! collaborator (AI or human review) decides `approved`/`rejected`; this
//! module only validates the states around that decision. An approved photo
//! can later be `returned` when it is deleted or expires, handing its quota
//! unit back to the uploader. `rejected` and `returned` are terminal.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Captured, awaiting moderation.
pub const PHOTO_STATUS_PENDING: &str = "pending";
/// Cleared by moderation; counts against quota and is revealed on development.
pub const PHOTO_STATUS_APPROVED: &str = "approved";
/// Refused by moderation.
pub const PHOTO_STATUS_REJECTED: &str = "rejected";
/// Deleted or expired after approval; its quota unit is given back.
pub const PHOTO_STATUS_RETURNED: &str = "returned";

/// All valid photo status values, matching the `photos.status` column.
pub const VALID_PHOTO_STATUSES: &[&str] = &[
    PHOTO_STATUS_PENDING,
    PHOTO_STATUS_APPROVED,
    PHOTO_STATUS_REJECTED,
    PHOTO_STATUS_RETURNED,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Moderation status of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl PhotoStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => PHOTO_STATUS_PENDING,
            Self::Approved => PHOTO_STATUS_APPROVED,
            Self::Rejected => PHOTO_STATUS_REJECTED,
            Self::Returned => PHOTO_STATUS_RETURNED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PHOTO_STATUS_PENDING => Ok(Self::Pending),
            PHOTO_STATUS_APPROVED => Ok(Self::Approved),
            PHOTO_STATUS_REJECTED => Ok(Self::Rejected),
            PHOTO_STATUS_RETURNED => Ok(Self::Returned),
            other => Err(CoreError::Validation(format!(
                "Unknown photo status: '{other}'. Valid statuses: {}",
                VALID_PHOTO_STATUSES.join(", ")
            ))),
        }
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Returned)
    }
}

impl std::fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome handed back by the external moderation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationDecision {
    Approved,
    Rejected { reason: Option<String> },
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of valid target statuses reachable from `from`.
pub fn valid_transitions(from: PhotoStatus) -> &'static [PhotoStatus] {
    use PhotoStatus::*;
    match from {
        Pending => &[Approved, Rejected],
        Approved => &[Returned],
        Rejected | Returned => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: PhotoStatus, to: PhotoStatus) -> bool {
    valid_transitions(from).contains(&to)
}

// ---------------------------------------------------------------------------
// Photo snapshot
// ---------------------------------------------------------------------------

/// Immutable value snapshot of a photo, as loaded from persistence.
///
/// Storage paths are deliberately absent: they are opaque references owned
/// by the external storage collaborator and never influence domain rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub status: PhotoStatus,
    pub rejection_reason: Option<String>,
    pub filter_id: Option<String>,
    pub date_stamped: bool,
    pub visible: bool,
    pub taken_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Validate that a photo is ready to be handed to the moderation
/// collaborator. The status itself does not change here; the decision is
/// made externally and applied via [`record_moderation`].
pub fn submit_for_moderation(photo: &Photo) -> Result<Photo, CoreError> {
    if photo.status != PhotoStatus::Pending {
        return Err(CoreError::InvalidPhotoState {
            photo_id: photo.id,
            status: photo.status,
            action: "submitted for moderation",
        });
    }
    Ok(photo.clone())
}

/// Apply the moderation collaborator's decision to a pending photo.
pub fn record_moderation(
    photo: &Photo,
    decision: ModerationDecision,
) -> Result<Photo, CoreError> {
    if photo.status != PhotoStatus::Pending {
        return Err(CoreError::InvalidPhotoState {
            photo_id: photo.id,
            status: photo.status,
            action: "moderated",
        });
    }
    let mut photo = photo.clone();
    match decision {
        ModerationDecision::Approved => {
            photo.status = PhotoStatus::Approved;
            photo.rejection_reason = None;
        }
        ModerationDecision::Rejected { reason } => {
            photo.status = PhotoStatus::Rejected;
            photo.rejection_reason = reason;
        }
    }
    Ok(photo)
}

/// Return an approved photo, freeing one unit of the uploader's quota.
///
/// Only `approved -> returned` is legal; returned photos are excluded from
/// every quota counting window.
pub fn return_photo(photo: &Photo) -> Result<Photo, CoreError> {
    if photo.status != PhotoStatus::Approved {
        return Err(CoreError::InvalidPhotoState {
            photo_id: photo.id,
            status: photo.status,
            action: "returned",
        });
    }
    let mut photo = photo.clone();
    photo.status = PhotoStatus::Returned;
    Ok(photo)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn photo(status: PhotoStatus) -> Photo {
        Photo {
            id: 7,
            room_id: 1,
            user_id: 10,
            status,
            rejection_reason: None,
            filter_id: None,
            date_stamped: false,
            visible: true,
            taken_at: Utc.with_ymd_and_hms(2025, 7, 2, 14, 0, 0).unwrap(),
            expires_at: None,
            created_at: Utc.with_ymd_and_hms(2025, 7, 2, 14, 0, 0).unwrap(),
        }
    }

    #[test]
    fn pending_reaches_approved_or_rejected_only() {
        assert!(can_transition(PhotoStatus::Pending, PhotoStatus::Approved));
        assert!(can_transition(PhotoStatus::Pending, PhotoStatus::Rejected));
        assert!(!can_transition(PhotoStatus::Pending, PhotoStatus::Returned));
    }

    #[test]
    fn approved_only_reaches_returned() {
        assert_eq!(
            valid_transitions(PhotoStatus::Approved),
            &[PhotoStatus::Returned]
        );
    }

    #[test]
    fn rejected_and_returned_are_terminal() {
        assert!(valid_transitions(PhotoStatus::Rejected).is_empty());
        assert!(valid_transitions(PhotoStatus::Returned).is_empty());
        assert!(PhotoStatus::Rejected.is_terminal());
        assert!(PhotoStatus::Returned.is_terminal());
    }

    #[test]
    fn submit_requires_pending() {
        assert!(submit_for_moderation(&photo(PhotoStatus::Pending)).is_ok());
        for status in [
            PhotoStatus::Approved,
            PhotoStatus::Rejected,
            PhotoStatus::Returned,
        ] {
            assert_matches!(
                submit_for_moderation(&photo(status)).unwrap_err(),
                CoreError::InvalidPhotoState { .. }
            );
        }
    }

    #[test]
    fn approval_clears_rejection_reason() {
        let mut pending = photo(PhotoStatus::Pending);
        pending.rejection_reason = Some("stale".to_string());
        let approved = record_moderation(&pending, ModerationDecision::Approved).unwrap();
        assert_eq!(approved.status, PhotoStatus::Approved);
        assert_eq!(approved.rejection_reason, None);
    }

    #[test]
    fn rejection_records_reason() {
        let rejected = record_moderation(
            &photo(PhotoStatus::Pending),
            ModerationDecision::Rejected {
                reason: Some("blurred faces".to_string()),
            },
        )
        .unwrap();
        assert_eq!(rejected.status, PhotoStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("blurred faces"));
    }

    #[test]
    fn moderating_twice_fails() {
        let approved = record_moderation(&photo(PhotoStatus::Pending), ModerationDecision::Approved)
            .unwrap();
        assert_matches!(
            record_moderation(&approved, ModerationDecision::Approved).unwrap_err(),
            CoreError::InvalidPhotoState { .. }
        );
    }

    #[test]
    fn return_succeeds_only_from_approved() {
        let returned = return_photo(&photo(PhotoStatus::Approved)).unwrap();
        assert_eq!(returned.status, PhotoStatus::Returned);

        for status in [
            PhotoStatus::Pending,
            PhotoStatus::Rejected,
            PhotoStatus::Returned,
        ] {
            assert_matches!(
                return_photo(&photo(status)).unwrap_err(),
                CoreError::InvalidPhotoState { .. }
            );
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            PhotoStatus::Pending,
            PhotoStatus::Approved,
            PhotoStatus::Rejected,
            PhotoStatus::Returned,
        ] {
            assert_eq!(PhotoStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert_matches!(
            PhotoStatus::from_str("developing"),
            Err(CoreError::Validation(_))
        );
    }
}
