//! Room entity model and DTOs.

use chrono::NaiveDate;
use darkroom_core::error::CoreError;
use darkroom_core::room_lifecycle::{self, DevelopmentType, RoomStatus};
use darkroom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub name: String,
    pub destination: Option<String>,
    pub icon: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub development_type: String,
    pub development_scheduled_at: Option<Timestamp>,
    pub developed_at: Option<Timestamp>,
    pub tz_offset_minutes: i32,
    pub photo_count: i32,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Room {
    /// Convert into the core crate's value snapshot, parsing the stored
    /// status and development type strings.
    pub fn to_domain(&self) -> Result<room_lifecycle::Room, CoreError> {
        Ok(room_lifecycle::Room {
            id: self.id,
            name: self.name.clone(),
            destination: self.destination.clone(),
            icon: self.icon.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: RoomStatus::from_str(&self.status)?,
            development_type: DevelopmentType::from_str(&self.development_type)?,
            development_scheduled_at: self.development_scheduled_at,
            developed_at: self.developed_at,
            tz_offset_minutes: self.tz_offset_minutes,
            photo_count: self.photo_count,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DTO for creating a room.
#[derive(Debug, Deserialize)]
pub struct CreateRoom {
    pub name: String,
    pub destination: Option<String>,
    pub icon: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Minutes east of UTC for the room's wall clock. Defaults to UTC.
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

/// DTO for choosing a room's development schedule.
#[derive(Debug, Deserialize)]
pub struct RequestDevelopment {
    pub development_type: String,
    /// Required when `development_type` is `custom`.
    pub custom_instant: Option<Timestamp>,
}
