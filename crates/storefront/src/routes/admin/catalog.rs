//! Admin category and product management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clear_hearing_core::{
    Category, CategoryId, CategoryInput, Product, ProductFilter, ProductId, ProductInput,
};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::extract::AppJson;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Result of deleting a category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeleted {
    pub id: CategoryId,
    /// Products that became uncategorized.
    pub uncategorized_products: usize,
}

#[instrument(skip_all)]
pub async fn list_categories(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Category>> {
    Json(state.store().catalog().list_categories())
}

#[instrument(skip(state, input))]
pub async fn create_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.store().catalog().upsert_category(None, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, input))]
pub async fn update_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<Json<Category>> {
    let category = state
        .store()
        .catalog()
        .upsert_category(Some(CategoryId::new(id)), input)
        .await?;
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn delete_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryDeleted>> {
    let id = CategoryId::new(id);
    let moved = state.store().catalog().delete_category(&id).await?;
    Ok(Json(CategoryDeleted {
        id,
        uncategorized_products: moved,
    }))
}

#[instrument(skip_all)]
pub async fn list_products(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Product>> {
    Json(state.store().catalog().list_products(&ProductFilter::All))
}

#[instrument(skip(state, input))]
pub async fn create_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.store().catalog().upsert_product(None, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, input))]
pub async fn update_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<Json<Product>> {
    let product = state
        .store()
        .catalog()
        .upsert_product(Some(ProductId::new(id)), input)
        .await?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state
        .store()
        .catalog()
        .delete_product(&ProductId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
