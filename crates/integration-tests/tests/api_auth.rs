//! Integration tests for session auth and the user-facing flows that hang
//! off it: order history and personalized recommendations.

use serde_json::{Value, json};

use vitrine_integration_tests::TestServer;

#[tokio::test]
async fn test_register_login_logout_flow() {
    let server = TestServer::spawn().await;

    let user = server.register_user("alice").await;
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user.get("password").is_none(), "password hash never leaves the server");

    // Registration logs the user in
    let me: Value = server
        .client
        .get(server.url("/api/user"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert_eq!(me["username"], "alice");

    // Logout drops the session
    let resp = server
        .client
        .post(server.url("/api/logout"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 204);

    let resp = server
        .client
        .get(server.url("/api/user"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 401);

    // And logging back in works
    let resp = server
        .client
        .post(server.url("/api/login"))
        .json(&json!({ "username": "alice", "password": "correct horse battery" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = TestServer::spawn().await;
    server.register_user("alice").await;

    let resp = server
        .client
        .post(server.url("/api/login"))
        .json(&json!({ "username": "alice", "password": "wrong password" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let server = TestServer::spawn().await;
    server.register_user("alice").await;

    let resp = server
        .client
        .post(server.url("/api/register"))
        .json(&json!({
            "username": "alice",
            "password": "another password",
            "email": "alice2@example.com",
            "name": "Alice Again",
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .post(server.url("/api/register"))
        .json(&json!({
            "username": "bob",
            "password": "short",
            "email": "bob@example.com",
            "name": "Bob",
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_order_history_requires_matching_user() {
    let server = TestServer::spawn().await;
    let user = server.register_user("alice").await;
    let user_id = user["id"].as_i64().expect("user id");

    // Own history is readable (empty so far)
    let resp = server
        .client
        .get(server.url(&format!("/api/user/{user_id}/orders")))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let orders: Vec<Value> = resp.json().await.expect("body");
    assert!(orders.is_empty());

    // Someone else's history is not
    let resp = server
        .client
        .get(server.url(&format!("/api/user/{}/orders", user_id + 1)))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_order_history_newest_first_and_recommendations_exclude_purchases() {
    let server = TestServer::spawn().await;
    let user = server.register_user("alice").await;
    let user_id = user["id"].as_i64().expect("user id");

    // First purchase: Bluetooth Headphones (product 3, Electronics)
    server.add_to_cart(3, 1).await;
    let cart_id = server.cart().await["cart"]["id"].clone();
    let first: Value = server
        .client
        .post(server.url("/api/orders"))
        .json(&json!({
            "cartId": cart_id,
            "shippingAddress": "1 Main St",
            "shippingCity": "Springfield",
            "shippingState": "SP",
            "shippingZipcode": "01000-000",
            "shippingMethod": "Standard Delivery",
            "shippingCost": "19.90",
            "paymentMethod": "pix",
        }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    // Second purchase: Premium Smartphone (product 1, Electronics)
    server.add_to_cart(1, 1).await;
    let cart_id = server.cart().await["cart"]["id"].clone();
    let second: Value = server
        .client
        .post(server.url("/api/orders"))
        .json(&json!({
            "cartId": cart_id,
            "shippingAddress": "1 Main St",
            "shippingCity": "Springfield",
            "shippingState": "SP",
            "shippingZipcode": "01000-000",
            "shippingMethod": "Express Delivery",
            "shippingCost": "0.00",
            "paymentMethod": "pix",
        }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    let orders: Vec<Value> = server
        .client
        .get(server.url(&format!("/api/user/{user_id}/orders")))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], second["id"]);
    assert_eq!(orders[1]["id"], first["id"]);

    // Recommendations never include the purchased products
    let recs: Vec<Value> = server
        .client
        .get(server.url(&format!("/api/recommendations?userId={user_id}")))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert!(!recs.is_empty());
    for rec in &recs {
        let id = rec["id"].as_i64().expect("product id");
        assert_ne!(id, 1, "purchased product recommended");
        assert_ne!(id, 3, "purchased product recommended");
    }
    // Purchases were Electronics, so Electronics leads the ranking
    assert_eq!(recs[0]["category"], "Electronics");
    assert_eq!(recs[0]["reasonCode"], "category");
}

#[tokio::test]
async fn test_recommendations_for_product_and_fallback() {
    let server = TestServer::spawn().await;

    // Product page: same category, self excluded, capped at 4
    let recs: Vec<Value> = server
        .client
        .get(server.url("/api/recommendations?productId=1"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert!(recs.len() <= 4);
    for rec in &recs {
        assert_eq!(rec["category"], "Electronics");
        assert_ne!(rec["id"].as_i64(), Some(1));
        assert_eq!(rec["reasonCode"], "similar");
    }

    // No parameters: popularity fallback, best rated first
    let recs: Vec<Value> = server
        .client
        .get(server.url("/api/recommendations"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");
    assert_eq!(recs.len(), 8);
    assert_eq!(recs[0]["name"], "The Power of Habit");
    assert_eq!(recs[0]["reasonCode"], "popular");
}

#[tokio::test]
async fn test_user_cart_survives_relogin() {
    let server = TestServer::spawn().await;
    server.register_user("alice").await;

    server.add_to_cart(1, 1).await;

    // Log out (session gone) and back in: the user's cart is found again
    server
        .client
        .post(server.url("/api/logout"))
        .send()
        .await
        .expect("logout");
    server
        .client
        .post(server.url("/api/login"))
        .json(&json!({ "username": "alice", "password": "correct horse battery" }))
        .send()
        .await
        .expect("login");

    let body = server.cart().await;
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
}
