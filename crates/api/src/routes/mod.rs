pub mod health;
pub mod photo;
pub mod room;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rooms                          list, create
/// /rooms/{id}                     get (lifecycle-refreshing), delete
/// /rooms/{id}/archive             archive (POST)
/// /rooms/{id}/development         request development schedule (POST)
/// /rooms/{id}/members             list, join
/// /rooms/{id}/members/leave       leave (POST)
/// /rooms/{id}/photos              capture, list
/// /rooms/{id}/photos/limit        remaining quota for the actor (GET)
///
/// /photos/{id}/moderate           moderation decision (POST)
/// /photos/{id}/return             return an approved photo (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Rooms, membership, and room-scoped photo endpoints.
        .nest("/rooms", room::router())
        // Photo-scoped moderation and return endpoints.
        .nest("/photos", photo::router())
}
