//! Repository for the `rooms` table.

use chrono::{DateTime, Utc};
use darkroom_core::room_lifecycle;
use darkroom_core::types::DbId;
use sqlx::PgPool;

use crate::models::room::{CreateRoom, Room};

/// Column list for `rooms` queries.
const COLUMNS: &str = "id, name, destination, icon, start_date, end_date, status, \
     development_type, development_scheduled_at, developed_at, tz_offset_minutes, \
     photo_count, owner_id, created_at, updated_at";

/// Provides CRUD operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Create a room and its owner membership in one transaction.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateRoom,
    ) -> Result<Room, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO rooms \
                (name, destination, icon, start_date, end_date, tz_offset_minutes, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&query)
            .bind(input.name.trim())
            .bind(&input.destination)
            .bind(&input.icon)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.tz_offset_minutes)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO room_members (room_id, user_id, role) \
             VALUES ($1, $2, 'owner')",
        )
        .bind(room.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(room)
    }

    /// Fetch a room by id. Soft-deleted rooms are returned too; visibility
    /// is the caller's call (owners still see their deleted rooms' audit
    /// trail, everyone else gets a 404 upstream).
    pub async fn get(pool: &PgPool, room_id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(room_id)
            .fetch_optional(pool)
            .await
    }

    /// List the non-deleted rooms a user is an active member of.
    pub async fn list_for_member(pool: &PgPool, user_id: DbId) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms \
             WHERE status <> 'deleted' \
               AND id IN (SELECT room_id FROM room_members \
                          WHERE user_id = $1 AND is_active) \
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Persist a lifecycle advance computed by the core rules: status,
    /// development schedule, and the developed-at audit stamp.
    pub async fn apply_lifecycle(
        pool: &PgPool,
        room: &room_lifecycle::Room,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "UPDATE rooms \
             SET status = $2, development_scheduled_at = $3, developed_at = $4, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(room.id)
            .bind(room.status.as_str())
            .bind(room.development_scheduled_at)
            .bind(room.developed_at)
            .fetch_one(pool)
            .await
    }

    /// Persist a development request: type and schedule, status untouched.
    pub async fn apply_development_request(
        pool: &PgPool,
        room: &room_lifecycle::Room,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "UPDATE rooms \
             SET development_type = $2, development_scheduled_at = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(room.id)
            .bind(room.development_type.as_str())
            .bind(room.development_scheduled_at)
            .fetch_one(pool)
            .await
    }

    /// List rooms the clock can still move: everything short of developed
    /// or terminal. The sweeper evaluates each against "now".
    pub async fn list_due_for_evaluation(pool: &PgPool) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms \
             WHERE status IN ('upcoming', 'active', 'pending_development') \
             ORDER BY id"
        );
        sqlx::query_as::<_, Room>(&query).fetch_all(pool).await
    }

    /// List developed rooms past the retention cutoff whose owner is not on
    /// the premium tier, i.e. candidates for policy archiving.
    pub async fn list_retention_candidates(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms \
             WHERE status = 'developed' \
               AND developed_at < $1 \
               AND owner_id IN (SELECT id FROM users WHERE plan <> 'premium') \
             ORDER BY id"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }
}
