//! The visitor cart.
//!
//! A cart is a multiset of product snapshots keyed by product id. It is
//! private to one browsing session and is never shared, so it is a plain
//! value with `&mut self` operations; the storefront keeps it in the
//! visitor's session.

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use crate::types::{Price, ProductId};

/// Largest quantity a single cart line can hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// The parts of a product a cart line and an order need.
///
/// Copied out of the catalog when the product is added, so that deleting or
/// repricing the product later never reaches into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Price,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
        }
    }
}

/// One cart line. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Observable cart change, returned by mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    /// A product was added; `quantity` is the line's new quantity.
    ItemAdded { product_id: ProductId, quantity: u32 },
    /// A line's quantity was overwritten.
    QuantityChanged { product_id: ProductId, quantity: u32 },
    /// A line was removed.
    ItemRemoved { product_id: ProductId },
    /// Nothing changed.
    Unchanged,
}

/// How [`Cart::reconcile`] changed a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum Reconciliation {
    /// The product is no longer in the catalog; the line was dropped.
    Dropped { product_id: ProductId, name: String },
    /// The catalog price differs from the price in the cart.
    Repriced {
        product_id: ProductId,
        old: Price,
        new: Price,
    },
}

/// A visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.find(product_id).map_or(0, |item| item.quantity)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same product id is incremented, up to
    /// [`MAX_LINE_QUANTITY`]; otherwise a new line with quantity 1 is
    /// appended.
    pub fn add_item(&mut self, product: &Product) -> CartEvent {
        let quantity = if let Some(item) = self.find_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
            item.quantity
        } else {
            self.items.push(CartItem {
                product: ProductSnapshot::from(product),
                quantity: 1,
            });
            1
        };

        CartEvent::ItemAdded {
            product_id: product.id.clone(),
            quantity,
        }
    }

    /// Overwrite the quantity of a line. Zero removes it; anything above
    /// [`MAX_LINE_QUANTITY`] is clamped to it.
    ///
    /// Setting the quantity of a product that is not in the cart does
    /// nothing.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> CartEvent {
        if quantity < 1 {
            return self.remove_item(product_id);
        }
        let quantity = quantity.min(MAX_LINE_QUANTITY);

        match self.find_mut(product_id) {
            Some(item) if item.quantity == quantity => CartEvent::Unchanged,
            Some(item) => {
                item.quantity = quantity;
                CartEvent::QuantityChanged {
                    product_id: product_id.clone(),
                    quantity,
                }
            }
            None => CartEvent::Unchanged,
        }
    }

    /// Remove a line. Removing an absent product is a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) -> CartEvent {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != product_id);
        if self.items.len() == before {
            CartEvent::Unchanged
        } else {
            CartEvent::ItemRemoved {
                product_id: product_id.clone(),
            }
        }
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Refresh line snapshots against the current catalog.
    ///
    /// `lookup` returns the catalog product for an id, or `None` if it was
    /// deleted. Deleted products are dropped; name, image and price are
    /// refreshed for the rest. Returns what changed in a way the visitor
    /// should be told about.
    pub fn reconcile<F>(&mut self, mut lookup: F) -> Vec<Reconciliation>
    where
        F: FnMut(&ProductId) -> Option<Product>,
    {
        let mut changes = Vec::new();
        self.items.retain_mut(|item| {
            let Some(current) = lookup(&item.product.id) else {
                changes.push(Reconciliation::Dropped {
                    product_id: item.product.id.clone(),
                    name: item.product.name.clone(),
                });
                return false;
            };

            if current.price != item.product.price {
                changes.push(Reconciliation::Repriced {
                    product_id: current.id.clone(),
                    old: item.product.price,
                    new: current.price,
                });
            }
            item.product = ProductSnapshot::from(&current);
            true
        });
        changes
    }

    fn find(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
    }
}
