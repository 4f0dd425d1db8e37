//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Each handler loads it, applies
//! one cart operation, saves it back and returns the updated view.

use axum::{Json, extract::State};
use clear_hearing_core::{Cart, CartEvent, CartItem, Price, ProductId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::AppJson;
use crate::models::SessionCart;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub price: Price,
    pub price_display: String,
    pub quantity: u32,
    pub line_total: Price,
    pub line_total_display: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        let line_total = item.line_total();
        Self {
            product_id: item.product.id.clone(),
            name: item.product.name.clone(),
            image_url: item.product.image_url.clone(),
            price: item.product.price,
            price_display: item.product.price.display(),
            quantity: item.quantity,
            line_total,
            line_total_display: line_total.display(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Price,
    pub total_display: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            total,
            total_display: total.display(),
            item_count: cart.item_count(),
        }
    }
}

/// Response to a cart mutation.
#[derive(Debug, Clone, Serialize)]
pub struct CartUpdate {
    pub event: CartEvent,
    pub cart: CartView,
}

/// Cart badge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update quantity request.
///
/// Quantity is signed so a client sending `-1` gets the line removed rather
/// than a decode error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove line request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = SessionCart::load(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    AppJson(form): AppJson<AddToCartForm>,
) -> Result<Json<CartUpdate>> {
    let product = state
        .store()
        .catalog()
        .get_product(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("Product {}", form.product_id)))?;

    let mut cart = SessionCart::load(&session).await?;
    let event = cart.add_item(&product);
    SessionCart::save(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(CartUpdate {
        event,
        cart: CartView::from(&cart),
    }))
}

/// Set the quantity of a cart line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    AppJson(form): AppJson<UpdateCartForm>,
) -> Result<Json<CartUpdate>> {
    let quantity = u32::try_from(form.quantity.max(0)).unwrap_or(u32::MAX);

    let mut cart = SessionCart::load(&session).await?;
    let event = cart.set_quantity(&form.product_id, quantity);
    if event != CartEvent::Unchanged {
        SessionCart::save(&session, &cart).await?;
    }

    Ok(Json(CartUpdate {
        event,
        cart: CartView::from(&cart),
    }))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    AppJson(form): AppJson<RemoveFromCartForm>,
) -> Result<Json<CartUpdate>> {
    let mut cart = SessionCart::load(&session).await?;
    let event = cart.remove_item(&form.product_id);
    if event != CartEvent::Unchanged {
        SessionCart::save(&session, &cart).await?;
    }

    Ok(Json(CartUpdate {
        event,
        cart: CartView::from(&cart),
    }))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = SessionCart::load(&session).await?;
    cart.clear();
    SessionCart::save(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Item count for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = SessionCart::load(&session).await?;
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}
