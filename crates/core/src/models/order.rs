//! Orders and checkout validation.
//!
//! An [`Order`] is created exactly once, from a cart and a customer form, by
//! [`Order::place`]. Its items and total are a frozen copy of the cart; only
//! the status changes afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartItem};
use super::record::{Collection, Record};
use crate::error::ValidationError;
use crate::types::{Email, OrderId, OrderStatus, Price};

/// Checkout form as submitted by a visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub comment: Option<String>,
}

impl CustomerForm {
    /// Validate the form into customer details.
    ///
    /// Required fields are checked in form order (first name, last name,
    /// phone, address) and the first blank one is reported. Email and
    /// comment are optional; a blank optional field is stored as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for the first blank
    /// required field, or [`ValidationError::InvalidEmail`] when an email is
    /// given but malformed.
    pub fn validate(&self) -> Result<Customer, ValidationError> {
        let first_name = required(&self.first_name, "firstName")?;
        let last_name = required(&self.last_name, "lastName")?;
        let phone = required(&self.phone, "phone")?;
        let address = required(&self.address, "address")?;

        let email = optional(self.email.as_deref())
            .map(Email::parse)
            .transpose()?;
        let comment = optional(self.comment.as_deref()).map(str::to_string);

        Ok(Customer {
            first_name,
            last_name,
            phone,
            email,
            address,
            comment,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validated customer details stored on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Customer {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    items: Vec<CartItem>,
    total: Price,
    pub customer: Customer,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Turn a cart and a checkout form into a new order.
    ///
    /// The form is validated first, then the cart is checked for emptiness.
    /// On success the cart's lines are deep-copied, the total is computed
    /// with [`Cart::total`], and the order starts as
    /// [`OrderStatus::New`]. The cart itself is not modified; clearing it
    /// is the caller's last step once the order has been stored.
    ///
    /// # Errors
    ///
    /// Returns the form's validation error, or [`ValidationError::EmptyCart`].
    pub fn place(
        cart: &Cart,
        form: &CustomerForm,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let customer = form.validate()?;
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }

        Ok(Self {
            id,
            items: cart.items().to_vec(),
            total: cart.total(),
            customer,
            created_at: now,
            status: OrderStatus::New,
        })
    }

    /// Frozen lines of the order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total at the time of ordering.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Set the status. Returns whether it changed.
    pub fn set_status(&mut self, status: OrderStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }
}

impl Record for Order {
    type Id = OrderId;
    const COLLECTION: Collection = Collection::Orders;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn set_id(&mut self, id: OrderId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        if self.items.iter().any(|item| item.quantity < 1) {
            return Err(ValidationError::EmptyField { field: "quantity" });
        }
        let recomputed: Price = self.items.iter().map(CartItem::line_total).sum();
        if recomputed != self.total {
            return Err(ValidationError::MalformedSnapshot(format!(
                "order {} total {} does not match its items ({recomputed})",
                self.id, self.total
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::models::catalog::Product;
    use crate::types::{CategoryId, ProductId};

    fn signia() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Signia X".to_string(),
            image_url: String::new(),
            price: Price::from_whole(25_000),
            description: String::new(),
            specs: String::new(),
            category_id: Some(CategoryId::new("1")),
        }
    }

    fn ivan() -> CustomerForm {
        CustomerForm {
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            phone: "+7 900 000-00-00".to_string(),
            email: None,
            address: "Moscow".to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_place_scenario() {
        let mut cart = Cart::new();
        cart.add_item(&signia());
        cart.add_item(&signia());

        let order = Order::place(&cart, &ivan(), OrderId::new("o1"), Utc::now()).unwrap();

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity, 2);
        assert_eq!(order.total(), Price::from_whole(50_000));
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.customer.full_name(), "Ivan Petrov");
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_first_missing_field_reported() {
        let mut cart = Cart::new();
        cart.add_item(&signia());

        let mut form = ivan();
        form.phone = "  ".to_string();
        form.address = String::new();
        assert_eq!(
            Order::place(&cart, &form, OrderId::new("o1"), Utc::now()),
            Err(ValidationError::MissingField { field: "phone" })
        );
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert_eq!(
            Order::place(&Cart::new(), &ivan(), OrderId::new("o1"), Utc::now()),
            Err(ValidationError::EmptyCart)
        );
    }

    #[test]
    fn test_optional_fields() {
        let mut form = ivan();
        form.email = Some("   ".to_string());
        form.comment = Some(" call after 6 ".to_string());
        let customer = form.validate().unwrap();
        assert_eq!(customer.email, None);
        assert_eq!(customer.comment.as_deref(), Some("call after 6"));

        form.email = Some("ivan@".to_string());
        assert!(matches!(form.validate(), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_items_are_a_copy() {
        let mut cart = Cart::new();
        let product = signia();
        cart.add_item(&product);
        let order = Order::place(&cart, &ivan(), OrderId::new("o1"), Utc::now()).unwrap();

        cart.add_item(&product);
        cart.clear();

        assert_eq!(order.items()[0].quantity, 1);
        assert_eq!(order.total(), Price::from_whole(25_000));
    }

    #[test]
    fn test_set_status_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&signia());
        let mut order = Order::place(&cart, &ivan(), OrderId::new("o1"), Utc::now()).unwrap();

        assert!(order.set_status(OrderStatus::Processing));
        assert!(!order.set_status(OrderStatus::Processing));
        assert!(order.set_status(OrderStatus::New));
        assert_eq!(order.status, OrderStatus::New);
    }

    #[test]
    fn test_tampered_total_fails_validation() {
        let mut cart = Cart::new();
        cart.add_item(&signia());
        let order = Order::place(&cart, &ivan(), OrderId::new("o1"), Utc::now()).unwrap();

        let mut json = serde_json::to_value(&order).unwrap();
        json["total"] = serde_json::json!("1");
        let tampered: Order = serde_json::from_value(json).unwrap();
        assert!(tampered.validate().is_err());
    }
}
