//! Clear Hearing Core - Shared types and domain rules.
//!
//! This crate provides the types used across all Clear Hearing components:
//! - `storefront` - Public catalog site with the embedded admin API
//! - `cli` - Command-line tools for snapshot export/import and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, validation and pure domain logic - no
//! I/O, no persistence, no HTTP. Cart arithmetic and order construction live
//! here so they can be tested without a running store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`models`] - Catalog, content, cart, order, and snapshot records
//! - [`error`] - Validation errors shared by every write path

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod models;
pub mod types;

pub use error::ValidationError;
pub use models::*;
pub use types::*;
