//! Snapshot export and import.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use clear_hearing_core::Snapshot;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::ImportSummary;

/// Export options.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub include_orders: bool,
}

/// Download the whole store as one JSON document.
#[instrument(skip(state))]
pub async fn export(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let snapshot = state.store().export_snapshot(query.include_orders);
    let filename = format!(
        "attachment; filename=\"clear-hearing-{}.json\"",
        Utc::now().format("%Y-%m-%d")
    );
    ([(header::CONTENT_DISPOSITION, filename)], Json(snapshot))
}

/// Replace the collections present in the uploaded document.
///
/// The body is taken as text so a malformed document is reported as a
/// validation error rather than a generic decode failure.
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn import(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportSummary>> {
    let snapshot = Snapshot::parse(&body)?;
    let summary = state.store().import_snapshot(snapshot).await?;
    info!(records = summary.records, "Admin import applied");
    Ok(Json(summary))
}
