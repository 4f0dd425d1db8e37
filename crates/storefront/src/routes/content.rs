//! Public content section handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use clear_hearing_core::{AboutItem, Article, ArticleId, Service};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.store().services().list().to_vec())
}

#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Json<Vec<AboutItem>> {
    Json(state.store().about().list().to_vec())
}

#[instrument(skip(state))]
pub async fn articles(State(state): State<AppState>) -> Json<Vec<Article>> {
    Json(state.store().articles().list().to_vec())
}

#[instrument(skip(state))]
pub async fn article(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Article>> {
    state
        .store()
        .articles()
        .get(&ArticleId::new(id.as_str()))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Article {id}")))
}
