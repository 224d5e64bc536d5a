//! Route definitions for the `/rooms` resource.
//!
//! All endpoints require an acting user.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{photo, room};
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// POST   /                    -> create_room
/// GET    /                    -> list_rooms
/// GET    /{id}                -> get_room
/// DELETE /{id}                -> delete_room
/// POST   /{id}/archive        -> archive_room
/// POST   /{id}/development    -> request_development
///
/// GET    /{id}/members        -> list_members
/// POST   /{id}/members        -> join_room
/// POST   /{id}/members/leave  -> leave_room
///
/// POST   /{id}/photos         -> capture_photo
/// GET    /{id}/photos         -> list_photos
/// GET    /{id}/photos/limit   -> photo_limit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Room collection and item endpoints
        .route("/", post(room::create_room).get(room::list_rooms))
        .route("/{id}", get(room::get_room).delete(room::delete_room))
        .route("/{id}/archive", post(room::archive_room))
        .route("/{id}/development", post(room::request_development))
        // Membership endpoints
        .route(
            "/{id}/members",
            get(room::list_members).post(room::join_room),
        )
        .route("/{id}/members/leave", post(room::leave_room))
        // Room-scoped photo endpoints
        .route(
            "/{id}/photos",
            post(photo::capture_photo).get(photo::list_photos),
        )
        .route("/{id}/photos/limit", get(photo::photo_limit))
}
