//! Domain records.
//!
//! - [`catalog`] - categories and products, the relational part
//! - [`content`] - flat content collections and the hero banner
//! - [`cart`] - the visitor cart engine
//! - [`order`] - checkout validation and placed orders
//! - [`snapshot`] - whole-store export/import document
//! - [`defaults`] - content for a fresh install

pub mod cart;
pub mod catalog;
pub mod content;
pub mod defaults;
pub mod order;
pub mod record;
pub mod snapshot;

pub use cart::{Cart, CartEvent, CartItem, MAX_LINE_QUANTITY, ProductSnapshot, Reconciliation};
pub use catalog::{Category, CategoryInput, Product, ProductFilter, ProductInput};
pub use content::{AboutItem, Advantage, Article, Hero, Partner, Service};
pub use order::{Customer, CustomerForm, Order};
pub use record::{Collection, Record, check_ids};
pub use snapshot::Snapshot;
