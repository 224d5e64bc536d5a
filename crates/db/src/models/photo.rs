//! Photo entity model and DTOs.

use darkroom_core::error::CoreError;
use darkroom_core::photo_status::{self, PhotoStatus};
use darkroom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub filter_id: Option<String>,
    pub date_stamped: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub visible: bool,
    pub low_quality_path: String,
    pub high_quality_path: String,
    pub thumbnail_path: String,
    pub taken_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Photo {
    /// Convert into the core crate's value snapshot, parsing the stored
    /// status. Storage paths stay behind: domain rules never touch them.
    pub fn to_domain(&self) -> Result<photo_status::Photo, CoreError> {
        Ok(photo_status::Photo {
            id: self.id,
            room_id: self.room_id,
            user_id: self.user_id,
            status: PhotoStatus::from_str(&self.status)?,
            rejection_reason: self.rejection_reason.clone(),
            filter_id: self.filter_id.clone(),
            date_stamped: self.date_stamped,
            visible: self.visible,
            taken_at: self.taken_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

/// DTO for capturing a photo.
///
/// `taken_at` is always stamped server-side so the quota window cannot be
/// steered by the client.
#[derive(Debug, Deserialize)]
pub struct CapturePhoto {
    pub filter_id: Option<String>,
    #[serde(default)]
    pub date_stamped: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Storage references for a newly captured photo, generated by the caller
/// and owned by the external storage collaborator.
#[derive(Debug, Clone)]
pub struct PhotoPaths {
    pub low_quality_path: String,
    pub high_quality_path: String,
    pub thumbnail_path: String,
}

/// DTO carrying the moderation collaborator's decision.
#[derive(Debug, Deserialize)]
pub struct ModeratePhoto {
    /// `approved` or `rejected`.
    pub decision: String,
    pub reason: Option<String>,
}
