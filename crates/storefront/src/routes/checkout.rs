//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use clear_hearing_core::CustomerForm;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{Result, add_breadcrumb};
use crate::extract::AppJson;
use crate::models::SessionCart;
use crate::state::AppState;
use crate::store::{Receipt, checkout};

/// Place an order from the session cart.
///
/// On success the cart in the session is emptied. On any failure it is left
/// as it was so the visitor can fix the form and retry.
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    AppJson(form): AppJson<CustomerForm>,
) -> Result<(StatusCode, Json<Receipt>)> {
    let mut cart = SessionCart::load(&session).await?;
    let store = state.store();

    let receipt = checkout(store.catalog(), store.orders(), &mut cart, &form).await?;
    SessionCart::save(&session, &cart).await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", receipt.order.id.as_str())]),
    );
    info!(order_id = %receipt.order.id, "Checkout complete");

    Ok((StatusCode::CREATED, Json(receipt)))
}
