//! Session-related types.

use clear_hearing_core::Cart;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the admin login flag.
    pub const ADMIN: &str = "admin";
}

/// Load/save helpers for the cart stored in a session.
pub struct SessionCart;

impl SessionCart {
    /// The visitor's cart, empty if none was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
        Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
    }

    /// Save the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::CART, cart).await
    }
}
