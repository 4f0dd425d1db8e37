//! Admin handlers for the flat content collections and the hero banner.
//!
//! Services, about items, articles, advantages and partners share one set of
//! generic handlers; [`AdminContent`] picks the right store out of the state.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clear_hearing_core::{AboutItem, Advantage, Article, Hero, Partner, Record, Service};
use tracing::instrument;

use crate::error::Result;
use crate::extract::AppJson;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::RecordStore;

/// A record type editable through the generic admin handlers.
pub trait AdminContent: Record {
    fn store(state: &AppState) -> &RecordStore<Self>;
}

impl AdminContent for Service {
    fn store(state: &AppState) -> &RecordStore<Self> {
        state.store().services()
    }
}

impl AdminContent for AboutItem {
    fn store(state: &AppState) -> &RecordStore<Self> {
        state.store().about()
    }
}

impl AdminContent for Article {
    fn store(state: &AppState) -> &RecordStore<Self> {
        state.store().articles()
    }
}

impl AdminContent for Advantage {
    fn store(state: &AppState) -> &RecordStore<Self> {
        state.store().advantages()
    }
}

impl AdminContent for Partner {
    fn store(state: &AppState) -> &RecordStore<Self> {
        state.store().partners()
    }
}

#[instrument(skip_all, fields(collection = %T::COLLECTION))]
pub async fn list<T: AdminContent>(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<T>> {
    Json(T::store(&state).list().to_vec())
}

#[instrument(skip_all, fields(collection = %T::COLLECTION))]
pub async fn create<T: AdminContent>(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    AppJson(record): AppJson<T>,
) -> Result<(StatusCode, Json<T>)> {
    let record = T::store(&state).create(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip_all, fields(collection = %T::COLLECTION, id = %id))]
pub async fn update<T>(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(record): AppJson<T>,
) -> Result<Json<T>>
where
    T: AdminContent,
    T::Id: From<String>,
{
    let record = T::store(&state).update(&T::Id::from(id), record).await?;
    Ok(Json(record))
}

#[instrument(skip_all, fields(collection = %T::COLLECTION, id = %id))]
pub async fn delete<T>(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode>
where
    T: AdminContent,
    T::Id: From<String>,
{
    T::store(&state).delete(&T::Id::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all)]
pub async fn get_hero(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Hero> {
    Json(state.store().hero().get())
}

#[instrument(skip_all)]
pub async fn put_hero(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    AppJson(hero): AppJson<Hero>,
) -> Result<Json<Hero>> {
    let hero = state.store().hero().replace(hero).await?;
    Ok(Json(hero))
}
