//! Cart operations through the HTTP surface, with the cart kept in the
//! session between requests.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use naya_merch_integration_tests::{FakeBackend, TestApp};

fn app() -> TestApp {
    TestApp::new(FakeBackend::new(Decimal::new(35, 0)))
}

fn total(body: &serde_json::Value) -> Decimal {
    body["total"].as_str().unwrap().parse().unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut app = app();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert_eq!(response.body["service"], "naya-merch-storefront");
    assert!(response.body["timestamp"].is_string());
    assert!(response.headers.contains_key("x-request-id"));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let mut app = app();

    let response = app.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"], json!([]));
    assert_eq!(response.body["count"], 0);
    assert_eq!(total(&response.body), Decimal::ZERO);

    let response = app.get("/cart/count").await;
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_add_distinct_products() {
    let mut app = app();
    app.add("1", "10.00", None).await;
    app.add("2", "25.50", Some("M")).await;

    let response = app.get("/cart").await;
    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "1");
    assert_eq!(items[0]["quantity"], 1);
    assert_eq!(items[1]["size"], "M");
    assert_eq!(response.body["count"], 2);
    assert_eq!(total(&response.body), Decimal::new(3550, 2));
}

#[tokio::test]
async fn test_cart_is_per_session() {
    let mut first = app();
    first.add("1", "10", None).await;

    let mut second = first.new_shopper();
    second.add("2", "20", None).await;
    second.add("2", "20", None).await;

    assert_eq!(first.get("/cart/count").await.body["count"], 1);
    assert_eq!(second.get("/cart/count").await.body["count"], 2);
}

/// Lines are keyed by product ID only: the second add in another size bumps
/// the first line and the size it was first added with wins. Kept pending a
/// product-owner decision on per-size lines.
#[tokio::test]
async fn test_same_product_in_another_size_merges() {
    let mut app = app();
    app.add("42", "35", Some("M")).await;
    let response = app.add("42", "35", Some("L")).await;

    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["size"], "M");
}

#[tokio::test]
async fn test_update_quantity_clamps_to_one() {
    let mut app = app();
    app.add("42", "35", None).await;

    let response = app.post("/cart/update", json!({"id": "42", "quantity": 5})).await;
    assert_eq!(response.body["count"], 5);

    let response = app.post("/cart/update", json!({"id": "42", "quantity": 0})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"][0]["quantity"], 1);

    let response = app.post("/cart/update", json!({"id": "42", "quantity": -3})).await;
    assert_eq!(response.body["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_increment_and_decrement() {
    let mut app = app();
    app.add("42", "35", None).await;

    app.post("/cart/increment", json!({"id": "42"})).await;
    let response = app.post("/cart/increment", json!({"id": "42"})).await;
    assert_eq!(response.body["count"], 3);
    assert_eq!(total(&response.body), Decimal::new(105, 0));

    for _ in 0..5 {
        app.post("/cart/decrement", json!({"id": "42"})).await;
    }
    let response = app.get("/cart").await;
    assert_eq!(response.body["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let mut app = app();
    app.add("1", "10", None).await;
    app.add("2", "20", None).await;

    let response = app.post("/cart/remove", json!({"id": "1"})).await;
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["items"][0]["id"], "2");

    // Absent IDs are a no-op.
    let response = app.post("/cart/remove", json!({"id": "999"})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 1);

    let response = app.post_empty("/cart/clear").await;
    assert_eq!(response.body["items"], json!([]));
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_operations_on_missing_line_are_noops() {
    let mut app = app();
    app.add("1", "10", None).await;

    let response = app.post("/cart/update", json!({"id": "2", "quantity": 9})).await;
    assert_eq!(response.body["count"], 1);

    let response = app.post("/cart/increment", json!({"id": "2"})).await;
    assert_eq!(response.body["count"], 1);
}

#[tokio::test]
async fn test_add_rejects_negative_price() {
    let mut app = app();
    let response = app.add("1", "-5", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_add_rejects_price_too_large_to_total() {
    let mut app = app();
    let response = app.add("42", "79228162514264337593543950335", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("price"));

    // Nothing was stored, so the session keeps working.
    let response = app.post("/cart/update", json!({"id": "42", "quantity": 2})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 0);

    let response = app.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"], json!([]));
}

#[tokio::test]
async fn test_largest_price_at_max_quantity_still_totals() {
    let mut app = app();
    let response = app.add("42", "1000000", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .post("/cart/update", json!({"id": "42", "quantity": i64::MAX}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], u64::from(u32::MAX));
    assert_eq!(
        total(&response.body),
        Decimal::from(1_000_000) * Decimal::from(u32::MAX)
    );
}

#[tokio::test]
async fn test_bare_and_global_ids_share_a_line() {
    let mut app = app();
    app.add("42", "35", None).await;
    let response = app.add("gid://shopify/Product/42", "35", None).await;

    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["count"], 2);

    let response = app
        .post("/cart/remove", json!({"id": "gid://shopify/Product/42"}))
        .await;
    assert_eq!(response.body["count"], 0);
}

#[tokio::test]
async fn test_add_rejects_malformed_body() {
    let mut app = app();
    let response = app.post("/cart/add", json!({"name": "No id"})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["error"]
            .as_str()
            .unwrap()
            .starts_with("Bad request:")
    );
}

#[tokio::test]
async fn test_missing_body_error_is_json() {
    let mut app = app();
    let response = app.post_empty("/cart/increment").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}
