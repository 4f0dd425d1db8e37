//! Admin panel API.
//!
//! Every handler except [`session::login`] takes a
//! [`RequireAdmin`](crate::middleware::RequireAdmin) extractor, so an
//! anonymous request gets a 401 before any store access happens.

pub mod catalog;
pub mod content;
pub mod orders;
pub mod session;
pub mod snapshot;

use axum::{
    Router,
    routing::{get, post, put},
};
use clear_hearing_core::{AboutItem, Advantage, Article, Partner, Service};

use crate::state::AppState;
use content::AdminContent;

/// Generic CRUD routes for a flat content collection.
fn content_routes<T>() -> Router<AppState>
where
    T: AdminContent,
    T::Id: From<String>,
{
    Router::new()
        .route("/", get(content::list::<T>).post(content::create::<T>))
        .route(
            "/{id}",
            put(content::update::<T>).delete(content::delete::<T>),
        )
}

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        // Catalog
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        // Content
        .nest("/services", content_routes::<Service>())
        .nest("/about", content_routes::<AboutItem>())
        .nest("/articles", content_routes::<Article>())
        .nest("/advantages", content_routes::<Advantage>())
        .nest("/partners", content_routes::<Partner>())
        .route("/hero", get(content::get_hero).put(content::put_hero))
        // Orders
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", put(orders::set_status))
        .route("/orders/{id}", axum::routing::delete(orders::delete))
        // Snapshot
        .route("/export", get(snapshot::export))
        .route("/import", post(snapshot::import))
}
