//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use clear_hearing_core::{Category, Product, ProductFilter, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Product listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub categories: Vec<Category>,
    pub products: Vec<ProductCard>,
    /// The filter that was applied, echoed back for the UI.
    pub active_category: String,
}

/// A product with its display price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
}

impl From<Product> for ProductCard {
    fn from(product: Product) -> Self {
        Self {
            price_display: product.price.display(),
            product,
        }
    }
}

/// Product detail.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub card: ProductCard,
    pub category: Option<Category>,
}

/// Display the product listing, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogView> {
    let filter = ProductFilter::from_query(query.category.as_deref());
    let catalog = state.store().catalog().snapshot();

    let active_category = match &filter {
        ProductFilter::All => ProductFilter::ALL.to_string(),
        ProductFilter::Uncategorized => ProductFilter::UNCATEGORIZED.to_string(),
        ProductFilter::Category(id) => id.to_string(),
    };

    Json(CatalogView {
        categories: catalog.categories.clone(),
        products: catalog
            .products_matching(&filter)
            .cloned()
            .map(ProductCard::from)
            .collect(),
        active_category,
    })
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let catalog = state.store().catalog().snapshot();
    let product = catalog
        .product(&ProductId::new(id.as_str()))
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;
    let category = product
        .category_id
        .as_ref()
        .and_then(|c| catalog.category(c))
        .cloned();

    Ok(Json(ProductView {
        card: product.into(),
        category,
    }))
}

/// List every category.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.store().catalog().list_categories())
}
