//! Integration tests for the cart API.
//!
//! Covers the cart invariants: lazy creation per session, quantity
//! incrementing for repeated adds, and total = Σ(price × quantity).

use serde_json::{Value, json};

use vitrine_integration_tests::TestServer;

#[tokio::test]
async fn test_cart_created_lazily_per_session() {
    let server = TestServer::spawn().await;

    let body = server.cart().await;
    assert!(body["cart"]["id"].is_number());
    assert_eq!(body["items"], json!([]));

    // The same session keeps the same cart
    let again = server.cart().await;
    assert_eq!(again["cart"]["id"], body["cart"]["id"]);
}

#[tokio::test]
async fn test_sessions_get_distinct_carts() {
    let server = TestServer::spawn().await;
    let cart_a = server.cart().await;

    // A second client has its own cookie jar, hence its own cart
    let other = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client");
    let cart_b: Value = other
        .get(server.url("/api/cart"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_ne!(cart_a["cart"]["id"], cart_b["cart"]["id"]);
}

#[tokio::test]
async fn test_adding_same_product_increments_quantity() {
    let server = TestServer::spawn().await;

    server.add_to_cart(3, 1).await;
    let item = server.add_to_cart(3, 2).await;
    assert_eq!(item["quantity"], 3);

    let body = server.cart().await;
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1, "no duplicate row for the same product");
    assert_eq!(items[0]["quantity"], 3);
}

#[tokio::test]
async fn test_item_price_is_product_price() {
    let server = TestServer::spawn().await;

    // The client-supplied price is ignored in favor of the catalog price
    let resp = server
        .client
        .post(server.url("/api/cart/items"))
        .json(&json!({ "productId": 3, "quantity": 1, "price": "0.01" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 201);
    let item: Value = resp.json().await.expect("body");
    assert_eq!(item["price"], "299.99");
}

#[tokio::test]
async fn test_cart_total_is_sum_of_line_totals() {
    let server = TestServer::spawn().await;

    server.add_to_cart(3, 2).await; // 2 x 299.99
    server.add_to_cart(6, 1).await; // 1 x 49.99

    let body = server.cart().await;
    let items = body["items"].as_array().expect("items");

    let total: f64 = items
        .iter()
        .map(|item| {
            let price: f64 = item["price"].as_str().expect("price").parse().expect("parse");
            let quantity = item["quantity"].as_f64().expect("quantity");
            price * quantity
        })
        .sum();
    assert!((total - 649.97).abs() < 1e-9);
}

#[tokio::test]
async fn test_update_and_remove_item() {
    let server = TestServer::spawn().await;

    let item = server.add_to_cart(1, 1).await;
    let item_id = item["id"].as_i64().expect("id");

    let resp = server
        .client
        .put(server.url(&format!("/api/cart/items/{item_id}")))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.expect("body");
    assert_eq!(updated["quantity"], 5);

    let resp = server
        .client
        .delete(server.url(&format!("/api/cart/items/{item_id}")))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 204);

    let body = server.cart().await;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_invalid_quantity_rejected() {
    let server = TestServer::spawn().await;
    let item = server.add_to_cart(1, 1).await;
    let item_id = item["id"].as_i64().expect("id");

    let resp = server
        .client
        .put(server.url(&format!("/api/cart/items/{item_id}")))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Invalid quantity");
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .post(server.url("/api/cart/items"))
        .json(&json!({ "productId": 999, "quantity": 1 }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_clear_cart() {
    let server = TestServer::spawn().await;

    server.add_to_cart(1, 1).await;
    let body = server.cart().await;
    let cart_id = body["cart"]["id"].as_i64().expect("cart id");

    let resp = server
        .client
        .delete(server.url(&format!("/api/cart?cartId={cart_id}")))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 204);

    let resp = server
        .client
        .delete(server.url(&format!("/api/cart?cartId={cart_id}")))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404, "clearing twice reports the missing cart");
}
