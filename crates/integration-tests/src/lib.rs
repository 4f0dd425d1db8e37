//! Integration tests for Clear Hearing.
//!
//! Each test spins up the full storefront router on an ephemeral port,
//! backed by in-memory persistence, and talks to it over HTTP with a
//! cookie-keeping client so the session cart and admin login carry over
//! between requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p clear-hearing-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart operations through the session
//! - `storefront_checkout` - Checkout and order placement
//! - `admin_api` - Admin auth, catalog, orders and snapshot import

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

use clear_hearing_storefront::config::StorefrontConfig;
use clear_hearing_storefront::persistence::MemoryPersistence;
use clear_hearing_storefront::state::AppState;
use clear_hearing_storefront::store::Store;
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::{Value, json};

/// Admin password configured for every test server.
pub const ADMIN_PASSWORD: &str = "hearing-test-4821";

/// A running storefront plus a client bound to it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
    pub persistence: Arc<MemoryPersistence>,
}

impl TestContext {
    /// Start a storefront with seeded defaults on 127.0.0.1.
    pub async fn new() -> Self {
        let persistence = Arc::new(MemoryPersistence::new());
        let store = Store::open(persistence.clone())
            .await
            .expect("Failed to open store");

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: addr.port(),
            base_url: base_url.clone(),
            data_dir: PathBuf::from("unused"),
            admin_password: SecretString::from(ADMIN_PASSWORD),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, store);
        let app = clear_hearing_storefront::app(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            client: new_client(),
            base_url,
            state,
            persistence,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT failed")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed")
    }

    /// Log this context's client into the admin panel.
    pub async fn login_admin(&self) {
        let resp = self
            .post("/admin/login", &json!({ "password": ADMIN_PASSWORD }))
            .await;
        assert_eq!(resp.status(), 204, "admin login failed");
    }

    /// Create a product through the admin API and return its id.
    ///
    /// The client must already be logged in.
    pub async fn create_product(&self, name: &str, price: &str, category_id: Option<&str>) -> String {
        let resp = self
            .post(
                "/admin/products",
                &json!({
                    "name": name,
                    "price": price,
                    "imageUrl": format!("/img/{name}.png"),
                    "categoryId": category_id,
                }),
            )
            .await;
        assert_eq!(resp.status(), 201, "product create failed");
        let product: Value = resp.json().await.expect("product body");
        product["id"].as_str().expect("product id").to_string()
    }

    /// Add one unit of a product to this client's cart.
    pub async fn add_to_cart(&self, product_id: &str) -> Value {
        let resp = self
            .post("/cart/add", &json!({ "productId": product_id }))
            .await;
        assert_eq!(resp.status(), 200, "add to cart failed");
        resp.json().await.expect("cart update body")
    }
}

/// A client that keeps the session cookie.
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
