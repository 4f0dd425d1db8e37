//! Admin panel API: auth, catalog edits, orders and snapshot import.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use clear_hearing_integration_tests::TestContext;
use serde_json::{Value, json};

#[tokio::test]
async fn test_admin_routes_require_login() {
    let ctx = TestContext::new().await;

    for path in ["/admin/orders", "/admin/products", "/admin/export"] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status(), 401, "{path} should require login");
    }

    let resp = ctx
        .post("/admin/categories", &json!({ "name": "Sneaky" }))
        .await;
    assert_eq!(resp.status(), 401);
    assert_eq!(ctx.state.store().catalog().list_categories().len(), 2);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post("/admin/login", &json!({ "password": "not-the-password" }))
        .await;
    assert_eq!(resp.status(), 401);
    assert_eq!(ctx.get("/admin/orders").await.status(), 401);
}

#[tokio::test]
async fn test_logout_ends_admin_session() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;
    assert_eq!(ctx.get("/admin/orders").await.status(), 200);

    let resp = ctx.post("/admin/logout", &json!({})).await;
    assert_eq!(resp.status(), 204);
    assert_eq!(ctx.get("/admin/orders").await.status(), 401);
}

#[tokio::test]
async fn test_delete_category_uncategorizes_products() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;
    let aid = ctx.create_product("Phonak Audeo", "25000", Some("1")).await;

    let resp = ctx.delete("/admin/categories/1").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["uncategorizedProducts"], 1);

    let catalog: Value = ctx
        .get("/catalog?category=uncategorized")
        .await
        .json()
        .await
        .unwrap();
    let products = catalog["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], aid.as_str());
}

#[tokio::test]
async fn test_product_with_unknown_category_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx
        .post(
            "/admin/products",
            &json!({ "name": "Orphan", "price": "100", "categoryId": "99" }),
        )
        .await;
    assert_eq!(resp.status(), 422);
    assert!(
        ctx.state
            .store()
            .catalog()
            .list_products(&clear_hearing_core::ProductFilter::All)
            .is_empty()
    );
}

#[tokio::test]
async fn test_order_status_updates() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;
    let aid = ctx.create_product("Oticon More", "30000", None).await;
    ctx.add_to_cart(&aid).await;
    let receipt: Value = ctx
        .post(
            "/checkout",
            &json!({
                "firstName": "Anna",
                "lastName": "Smirnova",
                "phone": "+7 900 000-00-00",
                "address": "Kazan",
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    let id = receipt["order"]["id"].as_str().unwrap().to_string();
    let path = format!("/admin/orders/{id}/status");

    for _ in 0..2 {
        let resp = ctx.put(&path, &json!({ "status": "processing" })).await;
        assert_eq!(resp.status(), 200);
        let order: Value = resp.json().await.unwrap();
        assert_eq!(order["status"], "processing");
    }

    let resp = ctx.put(&path, &json!({ "status": "shipped" })).await;
    assert_eq!(resp.status(), 422);
    let orders: Value = ctx.get("/admin/orders").await.json().await.unwrap();
    assert_eq!(orders[0]["status"], "processing");

    let resp = ctx
        .put("/admin/orders/missing/status", &json!({ "status": "completed" }))
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_malformed_import_changes_nothing() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;
    let before: Value = ctx.get("/admin/export").await.json().await.unwrap();

    let resp = ctx
        .client
        .post(ctx.url("/admin/import"))
        .body("{ \"categories\": [ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    let resp = ctx
        .post(
            "/admin/import",
            &json!({
                "categories": [{ "id": "5", "name": "Implants" }],
                "products": [{ "id": "p1", "name": "X", "price": "-1", "categoryId": "5" }],
            }),
        )
        .await;
    assert_eq!(resp.status(), 422);

    let resp = ctx
        .post(
            "/admin/import",
            &json!({
                "partners": [
                    { "id": "1", "name": "Signia" },
                    { "id": "1", "name": "Phonak" },
                ],
            }),
        )
        .await;
    assert_eq!(resp.status(), 422);

    let after: Value = ctx.get("/admin/export").await.json().await.unwrap();
    assert_eq!(before["categories"], after["categories"]);
    assert_eq!(before["products"], after["products"]);
    assert_eq!(before["partners"], after["partners"]);
}

#[tokio::test]
async fn test_import_with_unresolved_category_falls_back_to_uncategorized() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx
        .post(
            "/admin/import",
            &json!({
                "categories": [{ "id": "5", "name": "Implants" }],
                "products": [{ "id": "p1", "name": "X", "price": "1", "categoryId": "404" }],
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let products: Value = ctx.get("/admin/products").await.json().await.unwrap();
    assert_eq!(products[0]["id"], "p1");
    assert_eq!(products[0]["categoryId"], Value::Null);
}

#[tokio::test]
async fn test_export_then_import_roundtrip() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;
    ctx.create_product("Phonak Audeo", "25000", Some("1")).await;

    let resp = ctx.get("/admin/export").await;
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("attachment")
    );
    let snapshot: Value = resp.json().await.unwrap();
    assert!(snapshot.get("orders").is_none());

    let other = TestContext::new().await;
    other.login_admin().await;
    let resp = other.post("/admin/import", &snapshot).await;
    assert_eq!(resp.status(), 200);
    let summary: Value = resp.json().await.unwrap();
    assert!(summary["records"].as_u64().unwrap() >= 1);

    let catalog: Value = other.get("/catalog").await.json().await.unwrap();
    assert_eq!(catalog["products"][0]["name"], "Phonak Audeo");
}
