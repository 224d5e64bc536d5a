//! HTTP handlers, plus the room-loading helpers they share.

pub mod photo;
pub mod room;

use chrono::Utc;
use darkroom_core::error::CoreError;
use darkroom_core::room_lifecycle::{self, RoomStatus};
use darkroom_core::types::DbId;
use darkroom_db::models::room::Room as RoomRow;
use darkroom_db::repositories::{MemberRepo, RoomRepo};
use darkroom_events::{DomainEvent, EVENT_ROOM_DEVELOPED};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fetch a room row or fail with a typed 404.
pub(crate) async fn load_room(state: &AppState, room_id: DbId) -> AppResult<RoomRow> {
    RoomRepo::get(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))
}

/// Require the actor to be an active member of the room.
///
/// Non-members get the same 404 as a missing room so that room ids are not
/// probeable.
pub(crate) async fn require_membership(
    state: &AppState,
    room_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    match MemberRepo::get_active(&state.pool, room_id, user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        })),
    }
}

/// Evaluate a room's lifecycle at the current instant and persist any
/// advance, so reads always observe the clock-driven state.
///
/// Publishes `room.developed` when this refresh is the one that crosses
/// into `developed`. Returns the (possibly updated) row together with its
/// domain snapshot.
pub(crate) async fn refresh_lifecycle(
    state: &AppState,
    row: RoomRow,
) -> AppResult<(RoomRow, room_lifecycle::Room)> {
    let snapshot = row.to_domain()?;
    let evaluated = room_lifecycle::evaluate(&snapshot, Utc::now());

    if evaluated == snapshot {
        return Ok((row, snapshot));
    }

    let updated = RoomRepo::apply_lifecycle(&state.pool, &evaluated).await?;
    tracing::info!(
        room_id = evaluated.id,
        from = %snapshot.status,
        to = %evaluated.status,
        "Room lifecycle advanced on read"
    );

    if evaluated.status == RoomStatus::Developed && snapshot.status != RoomStatus::Developed {
        state.event_bus.publish(
            DomainEvent::new(EVENT_ROOM_DEVELOPED)
                .with_source("room", evaluated.id)
                .with_payload(serde_json::json!({
                    "room_id": evaluated.id,
                    "developed_at": evaluated.developed_at,
                })),
        );
    }

    Ok((updated, evaluated))
}
