//! Admin authentication extractor.
//!
//! The admin panel is guarded by a single shared password. A successful
//! login sets a flag in the visitor's session; [`RequireAdmin`] checks it.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::keys;

/// Extractor that requires an admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "admin only"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

/// Rejection returned when the admin flag is missing.
#[derive(Debug)]
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Admin login required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AdminRejection)?;

        let is_admin = session
            .get::<bool>(keys::ADMIN)
            .await
            .ok()
            .flatten()
            .unwrap_or(false);

        if is_admin { Ok(Self) } else { Err(AdminRejection) }
    }
}

/// Mark the session as logged in to the admin panel.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::ADMIN, true).await
}

/// Clear the admin flag (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<bool>(keys::ADMIN).await?;
    Ok(())
}
