//! Repository for the `photos` table.
//!
//! The capture path owns the count-then-authorize-then-insert sequence the
//! quota rules require: one transaction, serialized per (room, uploader) by
//! a transaction-scoped advisory lock, so two concurrent captures cannot
//! both observe the last free quota unit.

use darkroom_core::photo_status;
use darkroom_core::plan::Plan;
use darkroom_core::quota;
use darkroom_core::room_lifecycle;
use darkroom_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::photo::{CapturePhoto, Photo, PhotoPaths};
use crate::RepoError;

/// Column list for `photos` queries.
const COLUMNS: &str = "id, room_id, user_id, status, rejection_reason, filter_id, \
     date_stamped, latitude, longitude, visible, low_quality_path, high_quality_path, \
     thumbnail_path, taken_at, expires_at, created_at";

/// Provides capture and status operations for photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Fetch a photo by id.
    pub async fn get(pool: &PgPool, photo_id: DbId) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, Photo>(&query)
            .bind(photo_id)
            .fetch_optional(pool)
            .await
    }

    /// List a room's photos, newest first.
    pub async fn list_for_room(pool: &PgPool, room_id: DbId) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos \
             WHERE room_id = $1 \
             ORDER BY taken_at DESC, id DESC"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// List one uploader's photos in a room, newest first.
    pub async fn list_for_room_and_user(
        pool: &PgPool,
        room_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos \
             WHERE room_id = $1 AND user_id = $2 \
             ORDER BY taken_at DESC, id DESC"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(room_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Authorize and persist one capture.
    ///
    /// `room` must already be evaluated at `now`. The transaction takes an
    /// advisory lock keyed on (room, uploader), re-reads the uploader's
    /// photos, runs the core authorization, and only then inserts, so the
    /// quota can never be overspent by concurrent requests.
    pub async fn capture(
        pool: &PgPool,
        room: &room_lifecycle::Room,
        plan: Plan,
        user_id: DbId,
        input: &CapturePhoto,
        paths: &PhotoPaths,
        now: Timestamp,
    ) -> Result<Photo, RepoError> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("photo-quota:{}:{}", room.id, user_id))
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM photos \
             WHERE room_id = $1 AND user_id = $2"
        );
        let rows = sqlx::query_as::<_, Photo>(&query)
            .bind(room.id)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;
        let existing = rows
            .iter()
            .map(Photo::to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        quota::authorize_capture(plan, room, &existing, now)?;

        let insert = format!(
            "INSERT INTO photos \
                (room_id, user_id, filter_id, date_stamped, latitude, longitude, \
                 low_quality_path, high_quality_path, thumbnail_path, taken_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let photo = sqlx::query_as::<_, Photo>(&insert)
            .bind(room.id)
            .bind(user_id)
            .bind(&input.filter_id)
            .bind(input.date_stamped)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&paths.low_quality_path)
            .bind(&paths.high_quality_path)
            .bind(&paths.thumbnail_path)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE rooms SET photo_count = photo_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(room.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(photo)
    }

    /// Persist a moderation outcome computed by the core rules.
    pub async fn apply_moderation(
        pool: &PgPool,
        photo: &photo_status::Photo,
    ) -> Result<Photo, sqlx::Error> {
        let query = format!(
            "UPDATE photos \
             SET status = $2, rejection_reason = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(photo.id)
            .bind(photo.status.as_str())
            .bind(&photo.rejection_reason)
            .fetch_one(pool)
            .await
    }

    /// Persist a return computed by the core rules and hand the quota unit
    /// back by decrementing the room's photo count, atomically.
    pub async fn apply_return(
        pool: &PgPool,
        photo: &photo_status::Photo,
    ) -> Result<Photo, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE photos \
             SET status = $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Photo>(&query)
            .bind(photo.id)
            .bind(photo.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE rooms \
             SET photo_count = GREATEST(photo_count - 1, 0), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(photo.room_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
