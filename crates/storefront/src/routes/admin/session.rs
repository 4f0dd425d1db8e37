//! Admin login and logout.

use axum::{extract::State, http::StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::{clear_admin, set_admin};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: SecretString,
}

/// Log in with the shared admin password.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppJson(form): AppJson<LoginForm>,
) -> Result<StatusCode> {
    if !state
        .config()
        .admin_password_matches(form.password.expose_secret())
    {
        warn!("Admin login failed");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    set_admin(&session).await?;
    info!("Admin logged in");
    Ok(StatusCode::NO_CONTENT)
}

/// Log out of the admin panel. Always succeeds.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_admin(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
