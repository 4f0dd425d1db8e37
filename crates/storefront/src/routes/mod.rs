//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home: hero, advantages, partners, featured items
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /catalog                - Products (?category=<id|all|uncategorized>)
//! GET  /catalog/{id}           - Product detail
//! GET  /categories             - Category list
//!
//! # Content
//! GET  /services               - Services
//! GET  /about                  - About items
//! GET  /articles               - Articles
//! GET  /articles/{id}          - Article detail
//!
//! # Cart (session)
//! GET  /cart                   - Cart with totals
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set a line quantity (< 1 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Item count for the badge
//!
//! # Checkout
//! POST /checkout               - Place an order from the cart
//!
//! # Admin (all but login require the admin session)
//! POST /admin/login            - Log in with the shared password
//! POST /admin/logout           - Log out
//! GET|POST        /admin/categories, PUT|DELETE /admin/categories/{id}
//! GET|POST        /admin/products,   PUT|DELETE /admin/products/{id}
//! GET|POST        /admin/{services,about,articles,advantages,partners}
//! PUT|DELETE      /admin/{services,about,articles,advantages,partners}/{id}
//! GET|PUT  /admin/hero         - Hero banner
//! GET  /admin/orders           - Orders, newest first
//! PUT  /admin/orders/{id}/status
//! DELETE /admin/orders/{id}
//! GET  /admin/export           - Snapshot download (?include_orders=true)
//! POST /admin/import           - Snapshot upload
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod content;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{id}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/catalog", catalog_routes())
        .route("/categories", get(catalog::categories))
        // Content sections
        .route("/services", get(content::services))
        .route("/about", get(content::about))
        .route("/articles", get(content::articles))
        .route("/articles/{id}", get(content::article))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::place_order))
        // Admin panel
        .nest("/admin", admin::routes())
}
