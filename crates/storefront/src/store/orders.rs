//! Order log.
//!
//! Orders are append-only apart from their status. Deleting a product or a
//! category never reaches in here: each order carries its own copy of the
//! lines it was placed with.


use chrono::Utc;
use clear_hearing_core::{Cart, CustomerForm, Order, OrderId, OrderStatus, RecordId};
use tracing::{info, instrument};

use super::StoreError;
use super::cell::Draft;
use super::collection::RecordStore;

pub struct OrderLog {
    records: RecordStore<Order>,
}

impl OrderLog {
    pub(crate) const fn new(records: RecordStore<Order>) -> Self {
        Self { records }
    }

    /// Every order, newest first.
    pub fn list(&self) -> Vec<Order> {
        // Stable sort over the reversed log, so equal timestamps (common in
        // imported data) put the later-appended order first.
        let mut orders: Vec<Order> = self.records.list().iter().rev().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate and append a new order built from `cart`.
    ///
    /// The cart is only read; clearing it is the caller's job once this
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the first missing customer field, an invalid email,
    /// [`clear_hearing_core::ValidationError::EmptyCart`], or a storage
    /// error if the append could not be persisted.
    #[instrument(skip_all)]
    pub async fn place(&self, cart: &Cart, form: &CustomerForm) -> Result<Order, StoreError> {
        let order = Order::place(cart, form, OrderId::generate(), Utc::now())?;
        let order = self.records.insert(order).await?;
        info!(
            order_id = %order.id,
            total = %order.total(),
            lines = order.items().len(),
            "Order placed"
        );
        Ok(order)
    }

    /// Set the status of an order. Setting the status it already has is a
    /// successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`clear_hearing_core::ValidationError::UnknownStatus`] for a
    /// status outside the fixed set and [`StoreError::NotFound`] for an
    /// unknown order.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &OrderId, status: &str) -> Result<Order, StoreError> {
        let status: OrderStatus = status.parse()?;
        self.records
            .modify(id, |order| order.set_status(status))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &OrderId) -> Result<Order, StoreError> {
        self.records.delete(id).await
    }

    pub(crate) fn records(&self) -> &RecordStore<Order> {
        &self.records
    }

    pub(crate) async fn begin(&self) -> Draft<'_, Vec<Order>> {
        self.records.begin().await
    }
}
