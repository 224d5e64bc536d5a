//! Acting-user extractor for Axum handlers.
//!
//! End-user authentication lives in the deployment's gateway, which
//! forwards the verified identity as an `x-user-id` header. The service
//! trusts that header the way it would trust validated token claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use darkroom_core::error::CoreError;
use darkroom_core::types::DbId;

use crate::error::AppError;

/// The authenticated user on whose behalf a request runs.
///
/// Use this as an extractor parameter in any handler that requires an
/// acting user:
///
/// ```ignore
/// async fn my_handler(actor: ActingUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = actor.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActingUser {
    /// The user's database id, as asserted by the gateway.
    pub user_id: DbId,
}

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing x-user-id header".into(),
                ))
            })?;

        let user_id: DbId = header.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid x-user-id header; expected a numeric user id".into(),
            ))
        })?;

        Ok(ActingUser { user_id })
    }
}
