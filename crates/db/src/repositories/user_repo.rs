//! Repository for the `users` table.

use darkroom_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, display_name, plan, created_at, updated_at";

/// Read access to users and their plans.
pub struct UserRepo;

impl UserRepo {
    /// Fetch a user by id.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Provision a user row for a gateway-authenticated id on first contact.
    ///
    /// The gateway owns identity; this only guarantees the foreign keys
    /// resolve. Existing rows (and their plan) are left untouched.
    pub async fn ensure_exists(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (id, display_name) \
             VALUES ($1, $2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user_id)
        .bind(format!("traveller-{user_id}"))
        .execute(pool)
        .await?;
        Ok(())
    }
}
