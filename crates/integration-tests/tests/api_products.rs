//! Integration tests for the product catalog API.

use serde_json::Value;

use vitrine_integration_tests::TestServer;

#[tokio::test]
async fn test_product_listing() {
    let server = TestServer::spawn().await;

    let products: Vec<Value> = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(products.len(), 8);
    // Prices ride the wire as strings
    let first = products.first().expect("first product");
    assert_eq!(first["name"], "Premium Smartphone");
    assert_eq!(first["price"], "2499.99");
    assert_eq!(first["category"], "Electronics");
}

#[tokio::test]
async fn test_category_filter() {
    let server = TestServer::spawn().await;

    let products: Vec<Value> = server
        .client
        .get(server.url("/api/products?category=Books"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "The Power of Habit");
}

#[tokio::test]
async fn test_search_filter() {
    let server = TestServer::spawn().await;

    let products: Vec<Value> = server
        .client
        .get(server.url("/api/products?search=watch"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Smart Watch");
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .get(server.url("/api/products/1"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);

    let resp = server
        .client
        .get(server.url("/api/products/999"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_malformed_product_id_is_rejected() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .get(server.url("/api/products/not-a-number"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_categories() {
    let server = TestServer::spawn().await;

    let categories: Vec<String> = server
        .client
        .get(server.url("/api/categories"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("body");

    assert_eq!(
        categories,
        vec!["Apparel", "Books", "Electronics", "Home & Garden", "Sports"]
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = server
        .client
        .get(server.url("/health/ready"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
}
