//! Session-stored state.
//!
//! The cart is kept per visitor in the session and never written to the
//! store; only checkout turns it into something persistent.

pub mod session;

pub use session::{SessionCart, keys};
