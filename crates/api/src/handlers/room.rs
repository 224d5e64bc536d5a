//! Handlers for the `/rooms` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use darkroom_core::error::CoreError;
use darkroom_core::room_lifecycle::{self, DevelopmentType};
use darkroom_core::types::DbId;
use darkroom_db::models::member::JoinRoom;
use darkroom_db::models::room::{CreateRoom, RequestDevelopment};
use darkroom_db::repositories::{MemberRepo, RoomRepo, UserRepo};
use darkroom_events::{DomainEvent, EVENT_ROOM_ARCHIVED};

use super::{load_room, refresh_lifecycle, require_membership};
use crate::error::{AppError, AppResult};
use crate::middleware::actor::ActingUser;
use crate::state::AppState;

/// Fail with 403 unless the actor owns the room.
fn require_owner(room: &room_lifecycle::Room, actor: ActingUser) -> AppResult<()> {
    if room.owner_id != actor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the room owner may do this".to_string(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Room CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/rooms
///
/// Create a room. The actor becomes its owner and first member; the room
/// starts `upcoming` and advances purely by the clock from there.
pub async fn create_room(
    actor: ActingUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRoom>,
) -> AppResult<impl IntoResponse> {
    room_lifecycle::validate_new_room(
        &input.name,
        input.destination.as_deref(),
        &input.icon,
        input.start_date,
        input.end_date,
        input.tz_offset_minutes,
    )?;

    UserRepo::ensure_exists(&state.pool, actor.user_id).await?;
    let room = RoomRepo::create(&state.pool, actor.user_id, &input).await?;

    tracing::info!(room_id = room.id, owner_id = actor.user_id, "Room created");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": room })),
    ))
}

/// GET /api/v1/rooms
///
/// List the non-deleted rooms the actor is an active member of.
pub async fn list_rooms(
    actor: ActingUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let rooms = RoomRepo::list_for_member(&state.pool, actor.user_id).await?;
    Ok(Json(serde_json::json!({ "data": rooms })))
}

/// GET /api/v1/rooms/{id}
///
/// Fetch a room, refreshing its lifecycle first so the caller observes the
/// clock-driven status. Deleted rooms stay visible to their owner only.
pub async fn get_room(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_membership(&state, room_id, actor.user_id).await?;
    let row = load_room(&state, room_id).await?;

    if row.status == room_lifecycle::ROOM_STATUS_DELETED && row.owner_id != actor.user_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }));
    }

    let (row, _) = refresh_lifecycle(&state, row).await?;
    Ok(Json(serde_json::json!({ "data": row })))
}

/// DELETE /api/v1/rooms/{id}
///
/// Soft-delete a room (owner only). Photos and memberships are retained
/// for audit; the room just stops appearing in normal queries.
pub async fn delete_room(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = load_room(&state, room_id).await?;
    let snapshot = row.to_domain()?;
    require_owner(&snapshot, actor)?;

    let deleted = room_lifecycle::delete(&snapshot)?;
    RoomRepo::apply_lifecycle(&state.pool, &deleted).await?;

    tracing::info!(room_id, owner_id = actor.user_id, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/rooms/{id}/archive
///
/// Archive a room (owner only).
pub async fn archive_room(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let row = load_room(&state, room_id).await?;
    let snapshot = row.to_domain()?;
    require_owner(&snapshot, actor)?;

    let archived = room_lifecycle::archive(&snapshot)?;
    let row = RoomRepo::apply_lifecycle(&state.pool, &archived).await?;

    state.event_bus.publish(
        DomainEvent::new(EVENT_ROOM_ARCHIVED)
            .with_source("room", room_id)
            .with_actor(actor.user_id),
    );

    Ok(Json(serde_json::json!({ "data": row })))
}

// ---------------------------------------------------------------------------
// Development schedule
// ---------------------------------------------------------------------------

/// POST /api/v1/rooms/{id}/development
///
/// Choose how and when the room's photos develop (owner only). Legal while
/// the room is `active` or `pending_development`; the status itself still
/// only advances via lifecycle evaluation.
pub async fn request_development(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(input): Json<RequestDevelopment>,
) -> AppResult<Json<serde_json::Value>> {
    let row = load_room(&state, room_id).await?;
    let (_, snapshot) = refresh_lifecycle(&state, row).await?;
    require_owner(&snapshot, actor)?;

    let development_type = DevelopmentType::from_str(&input.development_type)?;
    let updated = room_lifecycle::request_development(&snapshot, development_type, input.custom_instant)?;
    let row = RoomRepo::apply_development_request(&state.pool, &updated).await?;

    tracing::info!(
        room_id,
        development_type = %development_type,
        "Development schedule updated"
    );
    Ok(Json(serde_json::json!({ "data": row })))
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// GET /api/v1/rooms/{id}/members
///
/// List a room's members, departed ones included.
pub async fn list_members(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    require_membership(&state, room_id, actor.user_id).await?;
    let members = MemberRepo::list_for_room(&state.pool, room_id).await?;
    Ok(Json(serde_json::json!({ "data": members })))
}

/// POST /api/v1/rooms/{id}/members
///
/// Join a room as a regular member. Terminal rooms cannot be joined.
pub async fn join_room(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(input): Json<JoinRoom>,
) -> AppResult<impl IntoResponse> {
    let row = load_room(&state, room_id).await?;
    let snapshot = row.to_domain()?;
    if snapshot.status.is_terminal() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Room {room_id} is {} and cannot be joined",
            snapshot.status
        ))));
    }

    UserRepo::ensure_exists(&state.pool, actor.user_id).await?;
    let member = MemberRepo::join(
        &state.pool,
        room_id,
        actor.user_id,
        input.nickname.as_deref(),
    )
    .await?;

    tracing::info!(room_id, user_id = actor.user_id, "Member joined room");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": member })),
    ))
}

/// POST /api/v1/rooms/{id}/members/leave
///
/// Leave a room. The departure instant is recorded exactly once; owners
/// must archive or delete instead.
pub async fn leave_room(
    actor: ActingUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let member = MemberRepo::leave(&state.pool, room_id, actor.user_id, Utc::now()).await?;
    Ok(Json(serde_json::json!({ "data": member })))
}
