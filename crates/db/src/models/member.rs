//! Room membership entity model and DTOs.

use darkroom_core::error::CoreError;
use darkroom_core::membership::{self, MemberRole};
use darkroom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `room_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomMember {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub nickname: Option<String>,
    pub joined_at: Timestamp,
    pub left_at: Option<Timestamp>,
    pub is_active: bool,
}

impl RoomMember {
    /// Convert into the core crate's value snapshot, parsing the stored role.
    pub fn to_domain(&self) -> Result<membership::RoomMember, CoreError> {
        Ok(membership::RoomMember {
            id: self.id,
            room_id: self.room_id,
            user_id: self.user_id,
            role: MemberRole::from_str(&self.role)?,
            nickname: self.nickname.clone(),
            joined_at: self.joined_at,
            left_at: self.left_at,
            is_active: self.is_active,
        })
    }
}

/// DTO for joining a room.
#[derive(Debug, Deserialize)]
pub struct JoinRoom {
    pub nickname: Option<String>,
}
