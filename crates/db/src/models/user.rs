//! User entity model.

use darkroom_core::error::CoreError;
use darkroom_core::plan::Plan;
use darkroom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
///
/// Identity is owned by the external gateway; this service only reads the
/// plan and display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub plan: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parse the stored plan string into its typed tier.
    pub fn plan(&self) -> Result<Plan, CoreError> {
        Plan::from_str(&self.plan)
    }
}
