//! Repository for the `room_members` table.
//!
//! Join and leave run the core membership rules inside a transaction; the
//! partial unique indexes back the same invariants at the database level,
//! so a race that slips past the in-transaction check still surfaces as a
//! unique violation rather than a second owner.

use chrono::{DateTime, Utc};
use darkroom_core::membership::{self, MemberRole};
use darkroom_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::RoomMember;
use crate::RepoError;

/// Column list for `room_members` queries.
const COLUMNS: &str = "id, room_id, user_id, role, nickname, joined_at, left_at, is_active";

/// Provides membership operations for rooms.
pub struct MemberRepo;

impl MemberRepo {
    /// List every membership row for a room, departed members included.
    pub async fn list_for_room(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Vec<RoomMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM room_members \
             WHERE room_id = $1 \
             ORDER BY joined_at, id"
        );
        sqlx::query_as::<_, RoomMember>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch a user's active membership in a room, if any.
    pub async fn get_active(
        pool: &PgPool,
        room_id: DbId,
        user_id: DbId,
    ) -> Result<Option<RoomMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM room_members \
             WHERE room_id = $1 AND user_id = $2 AND is_active"
        );
        sqlx::query_as::<_, RoomMember>(&query)
            .bind(room_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a user to a room as a regular member.
    pub async fn join(
        pool: &PgPool,
        room_id: DbId,
        user_id: DbId,
        nickname: Option<&str>,
    ) -> Result<RoomMember, RepoError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM room_members WHERE room_id = $1");
        let rows = sqlx::query_as::<_, RoomMember>(&query)
            .bind(room_id)
            .fetch_all(&mut *tx)
            .await?;
        let members = rows
            .iter()
            .map(RoomMember::to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        membership::validate_join(&members, user_id, MemberRole::Member, nickname)?;

        let insert = format!(
            "INSERT INTO room_members (room_id, user_id, role, nickname) \
             VALUES ($1, $2, 'member', $3) \
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, RoomMember>(&insert)
            .bind(room_id)
            .bind(user_id)
            .bind(nickname)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(member)
    }

    /// Record a member's departure at instant `now`.
    pub async fn leave(
        pool: &PgPool,
        room_id: DbId,
        user_id: DbId,
        now: DateTime<Utc>,
    ) -> Result<RoomMember, RepoError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM room_members \
             WHERE room_id = $1 AND user_id = $2 AND is_active \
             FOR UPDATE"
        );
        let row = sqlx::query_as::<_, RoomMember>(&query)
            .bind(room_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(darkroom_core::error::CoreError::NotFound {
                entity: "RoomMember",
                id: user_id,
            })?;

        let departed = membership::leave(&row.to_domain()?, now)?;

        let update = format!(
            "UPDATE room_members \
             SET left_at = $2, is_active = FALSE \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, RoomMember>(&update)
            .bind(row.id)
            .bind(departed.left_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(member)
    }
}
