//! Admin order management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clear_hearing_core::{Order, OrderId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::extract::AppJson;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// List orders, newest first.
#[instrument(skip_all)]
pub async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.store().orders().list())
}

/// Set an order's status. Unknown statuses are rejected with 422.
#[instrument(skip(state))]
pub async fn set_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(form): AppJson<StatusForm>,
) -> Result<Json<Order>> {
    let order = state
        .store()
        .orders()
        .set_status(&OrderId::new(id), &form.status)
        .await?;
    Ok(Json(order))
}

#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.store().orders().delete(&OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
