//! Route definitions for the `/photos` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::photo;
use crate::state::AppState;

/// Routes mounted at `/photos`.
///
/// ```text
/// POST   /{id}/moderate  -> moderate_photo
/// POST   /{id}/return    -> return_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/moderate", post(photo::moderate_photo))
        .route("/{id}/return", post(photo::return_photo))
}
