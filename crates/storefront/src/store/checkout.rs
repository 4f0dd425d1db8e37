//! Checkout: turn a visitor's cart into an order.

use clear_hearing_core::{Cart, CustomerForm, Order, Reconciliation};
use serde::Serialize;
use tracing::{instrument, warn};

use super::StoreError;
use super::catalog::CatalogStore;
use super::orders::OrderLog;

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub order: Order,
    /// Lines that were dropped or repriced because the catalog changed
    /// after they were added to the cart.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Reconciliation>,
}

/// Place an order for `cart` and empty it.
///
/// The cart is brought up to date with the catalog first. It is cleared only
/// after the order has been appended to the log; on any error it is left
/// exactly as it was.
///
/// # Errors
///
/// Validation errors (missing customer field, bad email, empty cart) and
/// storage errors from the order log.
#[instrument(skip_all, fields(lines = cart.items().len()))]
pub async fn checkout(
    catalog: &CatalogStore,
    orders: &OrderLog,
    cart: &mut Cart,
    form: &CustomerForm,
) -> Result<Receipt, StoreError> {
    let mut current = cart.clone();
    let snapshot = catalog.snapshot();
    let adjustments = current.reconcile(|id| snapshot.product(id).cloned());
    if !adjustments.is_empty() {
        warn!(count = adjustments.len(), "Cart was stale at checkout");
    }

    let order = orders.place(&current, form).await?;
    cart.clear();

    Ok(Receipt { order, adjustments })
}
