//! Handlers for photo capture, listing, quota, moderation, and return.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use darkroom_core::error::CoreError;
use darkroom_core::photo_status::{self, ModerationDecision};
use darkroom_core::plan::Plan;
use darkroom_core::quota;
use darkroom_core::room_lifecycle::RoomStatus;
use darkroom_core::types::DbId;
use darkroom_db::models::photo::{CapturePhoto, ModeratePhoto, Photo as PhotoRow, PhotoPaths};
use darkroom_db::repositories::{PhotoRepo, RoomRepo, UserRepo};
use darkroom_events::{DomainEvent, EVENT_PHOTO_RETURNED};

use super::{load_room, refresh_lifecycle, require_membership};
use crate::error::{AppError, AppResult};
use crate::middleware::actor::ActingUser;
use crate::state::AppState;

/// Resolve the actor's plan, provisioning the user row on first contact.
async fn actor_plan(state: &AppState, user_id: DbId) -> AppResult<Plan> {
    UserRepo::ensure_exists(&state.pool, user_id).await?;
    let user = UserRepo::get(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(user.plan()?)
}

/// Opaque storage references for a new capture. The blobs themselves are
/// uploaded to the external storage collaborator against these keys.
fn new_photo_paths(room_id: DbId) -> PhotoPaths {
    let key = uuid::Uuid::new_v4();
    PhotoPaths {
        low_quality_path: format!("rooms/{room_id}/photos/{key}_low.jpg"),
        high_quality_path: format!("rooms/{room_id}/photos/{key}_high.jpg"),
        thumbnail_path: format!("rooms/{room_id}/photos/{key}_thumb.jpg"),
    }
}

/// Fetch a photo row or fail with a typed 404.
async fn load_photo(state: &AppState, photo_id: DbId) -> AppResult<PhotoRow> {
    PhotoRepo::get(&state.pool, photo_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Photo",
            id: photo_id,
        }))
}

// ---------------------------------------------------------------------------
// Capture and listing
// ---------------------------------------------------------------------------

/// POST /api/v1/rooms/{id}/photos
///
/// Capture a photo into a room. The room's lifecycle is refreshed first,
/// then the repository authorizes the capture against the actor's plan
/// quota inside one serialized transaction.
pub async fn capture_photo(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(input): Json<CapturePhoto>,
) -> AppResult<impl IntoResponse> {
    require_membership(&state, room_id, actor.user_id).await?;
    let row = load_room(&state, room_id).await?;
    let (_, snapshot) = refresh_lifecycle(&state, row).await?;

    let plan = actor_plan(&state, actor.user_id).await?;
    let paths = new_photo_paths(room_id);
    let now = Utc::now();

    let photo = PhotoRepo::capture(
        &state.pool,
        &snapshot,
        plan,
        actor.user_id,
        &input,
        &paths,
        now,
    )
    .await?;

    // Hand the fresh capture to the external moderation pipeline.
    let submitted = photo_status::submit_for_moderation(&photo.to_domain()?)?;
    tracing::info!(
        photo_id = submitted.id,
        room_id,
        user_id = actor.user_id,
        "Photo captured and queued for moderation"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": photo })),
    ))
}

/// GET /api/v1/rooms/{id}/photos
///
/// List a room's photos. Until the room develops, members only see their
/// own captures; after development the whole roll is visible.
pub async fn list_photos(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_membership(&state, room_id, actor.user_id).await?;
    let row = load_room(&state, room_id).await?;
    let (_, snapshot) = refresh_lifecycle(&state, row).await?;

    let photos = if snapshot.status == RoomStatus::Developed {
        PhotoRepo::list_for_room(&state.pool, room_id).await?
    } else {
        PhotoRepo::list_for_room_and_user(&state.pool, room_id, actor.user_id).await?
    };

    Ok(Json(serde_json::json!({
        "data": photos,
        "developed": snapshot.status == RoomStatus::Developed,
    })))
}

/// GET /api/v1/rooms/{id}/photos/limit
///
/// The actor's remaining capture budget for this room.
pub async fn photo_limit(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_membership(&state, room_id, actor.user_id).await?;
    let row = load_room(&state, room_id).await?;
    let (_, snapshot) = refresh_lifecycle(&state, row).await?;

    let plan = actor_plan(&state, actor.user_id).await?;
    let rows = PhotoRepo::list_for_room_and_user(&state.pool, room_id, actor.user_id).await?;
    let existing = rows
        .iter()
        .map(PhotoRow::to_domain)
        .collect::<Result<Vec<_>, _>>()?;

    let limit = quota::photo_limit(plan, &existing, Utc::now(), snapshot.tz_offset_minutes);

    Ok(Json(serde_json::json!({
        "data": {
            "remaining": limit.remaining,
            "limit": limit.limit,
            "is_guest": limit.is_guest,
            "can_take_photo": limit.can_take_photo(),
        }
    })))
}

// ---------------------------------------------------------------------------
// Moderation and return
// ---------------------------------------------------------------------------

/// POST /api/v1/photos/{id}/moderate
///
/// Apply the moderation collaborator's decision to a pending photo. The
/// collaborator authenticates at the gateway; the decision itself is never
/// made here.
pub async fn moderate_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<DbId>,
    Json(input): Json<ModeratePhoto>,
) -> AppResult<Json<serde_json::Value>> {
    let row = load_photo(&state, photo_id).await?;

    let decision = match input.decision.as_str() {
        "approved" => ModerationDecision::Approved,
        "rejected" => ModerationDecision::Rejected {
            reason: input.reason.clone(),
        },
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown moderation decision: '{other}'. Expected 'approved' or 'rejected'"
            ))));
        }
    };

    let moderated = photo_status::record_moderation(&row.to_domain()?, decision)?;
    let row = PhotoRepo::apply_moderation(&state.pool, &moderated).await?;

    tracing::info!(photo_id, status = %row.status, "Moderation decision recorded");
    Ok(Json(serde_json::json!({ "data": row })))
}

/// POST /api/v1/photos/{id}/return
///
/// Return an approved photo (uploader or room owner), freeing one unit of
/// the uploader's quota.
pub async fn return_photo(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(photo_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let row = load_photo(&state, photo_id).await?;

    if row.user_id != actor.user_id {
        let room = RoomRepo::get(&state.pool, row.room_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Room",
                id: row.room_id,
            }))?;
        if room.owner_id != actor.user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the uploader or the room owner may return a photo".to_string(),
            )));
        }
    }

    let returned = photo_status::return_photo(&row.to_domain()?)?;
    let row = PhotoRepo::apply_return(&state.pool, &returned).await?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_PHOTO_RETURNED)
            .with_source("photo", photo_id)
            .with_actor(actor.user_id)
            .with_payload(serde_json::json!({
                "photo_id": photo_id,
                "room_id": row.room_id,
                "user_id": row.user_id,
            })),
    );

    Ok(Json(serde_json::json!({ "data": row })))
}
