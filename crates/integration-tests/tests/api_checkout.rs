//! Integration tests for the checkout path: shipping calculation, order
//! creation, and the simulated payment step.

use serde_json::{Value, json};

use vitrine_integration_tests::TestServer;

fn order_payload(cart_id: Value) -> Value {
    json!({
        "cartId": cart_id,
        "shippingAddress": "1 Main St",
        "shippingCity": "Springfield",
        "shippingState": "SP",
        "shippingZipcode": "01000-000",
        "shippingMethod": "Standard Delivery",
        "shippingCost": "19.90",
        "paymentMethod": "credit",
    })
}

#[tokio::test]
async fn test_shipping_options_listed() {
    let server = TestServer::spawn().await;

    let options: Vec<Value> = server
        .client
        .get(server.url("/api/shipping/options"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(options.len(), 3);
    assert!(options.iter().any(|o| o["name"] == "Express Delivery"));
}

#[tokio::test]
async fn test_free_express_shipping_above_300() {
    let server = TestServer::spawn().await;

    // 2 x 299.99 = 599.98 > 300
    server.add_to_cart(3, 2).await;
    let cart_id = server.cart().await["cart"]["id"].clone();

    let calc: Value = server
        .client
        .post(server.url("/api/shipping/calculate"))
        .json(&json!({ "cartId": cart_id, "zipcode": "01000-000" }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(calc["bestOption"]["name"], "Express Delivery (Free)");
    assert_eq!(calc["bestOption"]["price"], "0.00");
}

#[tokio::test]
async fn test_standard_shipping_at_or_below_300() {
    let server = TestServer::spawn().await;

    // 1 x 299.99 < 300
    server.add_to_cart(3, 1).await;
    let cart_id = server.cart().await["cart"]["id"].clone();

    let calc: Value = server
        .client
        .post(server.url("/api/shipping/calculate"))
        .json(&json!({ "cartId": cart_id, "zipcode": "01000-000" }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(calc["bestOption"]["name"], "Standard Delivery");
}

#[tokio::test]
async fn test_shipping_calculate_requires_fields() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .post(server.url("/api/shipping/calculate"))
        .json(&json!({ "zipcode": "01000-000" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_order_from_empty_cart_rejected() {
    let server = TestServer::spawn().await;
    let cart_id = server.cart().await["cart"]["id"].clone();

    let resp = server
        .client
        .post(server.url("/api/orders"))
        .json(&order_payload(cart_id))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn test_order_snapshots_cart_and_clears_it() {
    let server = TestServer::spawn().await;

    server.add_to_cart(3, 2).await;
    server.add_to_cart(6, 1).await;
    let cart_id = server.cart().await["cart"]["id"].clone();

    let resp = server
        .client
        .post(server.url("/api/orders"))
        .json(&order_payload(cart_id))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 201);
    let order: Value = resp.json().await.expect("body");

    assert_eq!(order["status"], "pending");
    // Totals are computed server-side: 649.97 + 19.90
    assert_eq!(order["subtotal"], "649.97");
    assert_eq!(order["total"], "669.87");

    // The order is readable with its snapshotted items
    let order_id = order["id"].as_i64().expect("order id");
    let with_items: Value = server
        .client
        .get(server.url(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    let items = with_items["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .any(|i| i["productName"] == "Bluetooth Headphones" && i["quantity"] == 2));

    // A fresh cart is created on the next request
    let body = server.cart().await;
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_payment_credit_without_details_declined() {
    let server = TestServer::spawn().await;

    server.add_to_cart(1, 1).await;
    let cart_id = server.cart().await["cart"]["id"].clone();
    let order: Value = server
        .client
        .post(server.url("/api/orders"))
        .json(&order_payload(cart_id))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    let outcome: Value = server
        .client
        .post(server.url("/api/payment/process"))
        .json(&json!({ "orderId": order["id"], "paymentMethod": "credit" }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(outcome["success"], false);

    // The order stays pending; there is no compensation logic
    let order_id = order["id"].as_i64().expect("order id");
    let fetched: Value = server
        .client
        .get(server.url(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert_eq!(fetched["status"], "pending");
}

#[tokio::test]
async fn test_payment_credit_success_marks_paid() {
    let server = TestServer::spawn().await;

    server.add_to_cart(1, 1).await;
    let cart_id = server.cart().await["cart"]["id"].clone();
    let order: Value = server
        .client
        .post(server.url("/api/orders"))
        .json(&order_payload(cart_id))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    let outcome: Value = server
        .client
        .post(server.url("/api/payment/process"))
        .json(&json!({
            "orderId": order["id"],
            "paymentMethod": "credit",
            "paymentDetails": { "cardNumber": "4111111111111111" },
        }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(outcome["success"], true);
    assert!(outcome["transactionId"]
        .as_str()
        .expect("transaction id")
        .starts_with("CC-"));
    assert_eq!(outcome["details"]["last4"], "1111");

    let order_id = order["id"].as_i64().expect("order id");
    let fetched: Value = server
        .client
        .get(server.url(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert_eq!(fetched["status"], "paid");
}

#[tokio::test]
async fn test_payment_methods_listed() {
    let server = TestServer::spawn().await;

    let methods: Vec<Value> = server
        .client
        .get(server.url("/api/payment/methods"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    let codes: Vec<&str> = methods
        .iter()
        .filter_map(|m| m["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["credit", "boleto", "pix"]);
}

#[tokio::test]
async fn test_payment_for_unknown_order_is_404() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .post(server.url("/api/payment/process"))
        .json(&json!({ "orderId": 999, "paymentMethod": "pix" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
}
