//! Validation errors.
//!
//! Every write path (admin CRUD, checkout, snapshot import, status updates)
//! reports bad input through [`ValidationError`]. These errors are always
//! recoverable by the caller: nothing has been written when one is returned.

use crate::types::EmailError;

/// Bad or missing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A required checkout field was not filled in.
    #[error("{field} is required")]
    MissingField {
        /// Name of the first missing field.
        field: &'static str,
    },

    /// Price below zero.
    #[error("price cannot be negative")]
    NegativePrice,

    /// Price above [`Price::MAX`](crate::types::Price::MAX).
    #[error("price is too high")]
    PriceTooHigh,

    /// Email provided but malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Checkout attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Status outside the fixed order status set.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// Product references a category that does not exist.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Identifier is empty or otherwise unusable.
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    /// Two records in one collection share an id.
    #[error("duplicate id {id} in {collection}")]
    DuplicateId {
        /// Collection containing the duplicate.
        collection: &'static str,
        /// The repeated id.
        id: String,
    },

    /// Snapshot document could not be parsed.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

impl ValidationError {
    /// The field this error refers to, if it is field-level.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyField { field } | Self::MissingField { field } => Some(field),
            Self::NegativePrice | Self::PriceTooHigh => Some("price"),
            Self::InvalidEmail(_) => Some("email"),
            Self::UnknownStatus(_) => Some("status"),
            Self::UnknownCategory(_) => Some("category_id"),
            _ => None,
        }
    }
}

/// Reject empty or whitespace-only text.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] naming `field`.
pub fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("Signia", "name").is_ok());
        assert_eq!(
            require_text("   ", "name"),
            Err(ValidationError::EmptyField { field: "name" })
        );
    }

    #[test]
    fn test_display_names_field() {
        let err = ValidationError::MissingField { field: "phone" };
        assert_eq!(err.to_string(), "phone is required");
        assert_eq!(err.field(), Some("phone"));
    }

    #[test]
    fn test_empty_cart_has_no_field() {
        assert_eq!(ValidationError::EmptyCart.field(), None);
        assert_eq!(ValidationError::EmptyCart.to_string(), "cart is empty");
    }
}
