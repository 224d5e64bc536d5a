use crate::photo_status::PhotoStatus;
use crate::room_lifecycle::RoomStatus;
use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every failure is a typed, synchronous rejection: the operation that
/// produced it leaves its input snapshot unchanged, and no variant is
/// retried at this layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A custom development instant that precedes the room's end date.
    #[error("Invalid development schedule: {0}")]
    InvalidSchedule(String),

    /// An archive/delete/development mutation on a room that is already DELETED.
    #[error("Room {room_id} is in terminal status {status} and cannot be modified")]
    TerminalState { room_id: DbId, status: RoomStatus },

    /// Capture attempted with no quota remaining. Carries the guest flag so
    /// callers can differentiate upsell messaging.
    #[error("Photo quota exhausted (limit {limit}, guest: {is_guest})")]
    QuotaExceeded { is_guest: bool, limit: u32 },

    /// Capture attempted while the room is not ACTIVE.
    #[error("Room {room_id} is not active (status {status})")]
    RoomNotActive { room_id: DbId, status: RoomStatus },

    /// A photo status transition requested from the wrong starting status.
    #[error("Photo {photo_id} cannot be {action} from status {status}")]
    InvalidPhotoState {
        photo_id: DbId,
        status: PhotoStatus,
        action: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
