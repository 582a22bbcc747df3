//! Handler tests for the Orders domain
//!
//! These tests drive the order placement endpoint end to end over the
//! in-memory repositories, including the JWT middleware in the tests
//! that cover authentication.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, middleware};
use axum_helpers::auth::{JwtAuth, JwtClaims, JwtConfig, jwt_auth_middleware};
use domain_catalog::{CreateProduct, InMemoryProductRepository, Product, ProductRepository};
use domain_orders::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn claims_for(user_id: Uuid) -> JwtClaims {
    JwtClaims {
        sub: user_id.to_string(),
        email: "buyer@example.com".to_string(),
        name: "Buyer".to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: chrono::Utc::now().timestamp(),
        jti: Uuid::new_v4().to_string(),
    }
}

/// Router with claims pre-injected, as the auth middleware would do
fn authed_app(catalog: InMemoryProductRepository, user_id: Uuid) -> axum::Router {
    let service = OrderService::new(InMemoryOrderRepository::new(catalog));
    handlers::router(service).layer(Extension(claims_for(user_id)))
}

async fn seed(catalog: &InMemoryProductRepository, name: &str, price: f64, stock: i32) -> Product {
    catalog
        .create(CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
        })
        .await
        .unwrap()
}

fn place_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_place_order_returns_201_with_snapshot_prices() {
    let catalog = InMemoryProductRepository::new();
    let keyboard = seed(&catalog, "Keyboard", 79.99, 10).await;
    let mouse = seed(&catalog, "Mouse", 25.50, 5).await;
    let user_id = Uuid::now_v7();
    let app = authed_app(catalog.clone(), user_id);

    let response = app
        .oneshot(place_request(json!({
            "items": [
                {"product": keyboard.id, "quantity": 2},
                {"product": mouse.id, "quantity": 1}
            ]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["user_id"], json!(user_id));
    assert_eq!(body["status"], json!("pending"));
    assert_eq!(body["total_price"], json!(79.99 * 2.0 + 25.50));
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["price"], json!(79.99));
    assert_eq!(items[0]["quantity"], json!(2));

    // Stock 10/5 ordered 2+1 leaves 8/4
    assert_eq!(
        catalog.get_by_id(keyboard.id).await.unwrap().unwrap().stock,
        8
    );
    assert_eq!(catalog.get_by_id(mouse.id).await.unwrap().unwrap().stock, 4);
}

#[tokio::test]
async fn test_empty_order_returns_400_with_message() {
    let app = authed_app(InMemoryProductRepository::new(), Uuid::now_v7());

    let response = app
        .oneshot(place_request(json!({"items": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        json!("An order should contain at least one item.")
    );
}

#[tokio::test]
async fn test_insufficient_stock_returns_400_and_leaves_stock_unchanged() {
    let catalog = InMemoryProductRepository::new();
    let keyboard = seed(&catalog, "Keyboard", 79.99, 10).await;
    let app = authed_app(catalog.clone(), Uuid::now_v7());

    let response = app
        .oneshot(place_request(json!({
            "items": [{"product": keyboard.id, "quantity": 11}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        json!("Insufficient stock for Keyboard. Available: 10, Requested: 11")
    );

    assert_eq!(
        catalog.get_by_id(keyboard.id).await.unwrap().unwrap().stock,
        10
    );
}

#[tokio::test]
async fn test_zero_quantity_returns_400_naming_product() {
    let catalog = InMemoryProductRepository::new();
    let keyboard = seed(&catalog, "Keyboard", 79.99, 10).await;
    let app = authed_app(catalog, Uuid::now_v7());

    let response = app
        .oneshot(place_request(json!({
            "items": [{"product": keyboard.id, "quantity": 0}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], json!("Quantity must be positive for Keyboard"));
}

#[tokio::test]
async fn test_unknown_product_returns_400() {
    let app = authed_app(InMemoryProductRepository::new(), Uuid::now_v7());

    let missing = Uuid::now_v7();
    let response = app
        .oneshot(place_request(json!({
            "items": [{"product": missing, "quantity": 1}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        json!(format!("Invalid pk \"{missing}\" - object does not exist."))
    );
}

#[tokio::test]
async fn test_place_order_without_token_returns_401() {
    let jwt_auth = JwtAuth::new(&JwtConfig::new(
        "test-secret-key-with-enough-entropy!",
    ));
    let service = OrderService::new(InMemoryOrderRepository::new(
        InMemoryProductRepository::new(),
    ));
    let app = handlers::router(service).layer(middleware::from_fn_with_state(
        jwt_auth,
        jwt_auth_middleware,
    ));

    let response = app
        .oneshot(place_request(json!({"items": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_place_order_with_bearer_token_is_authenticated() {
    let jwt_auth = JwtAuth::new(&JwtConfig::new(
        "test-secret-key-with-enough-entropy!",
    ));
    let user_id = Uuid::now_v7();
    let token = jwt_auth
        .create_token(&user_id.to_string(), "buyer@example.com", "Buyer")
        .unwrap();

    let catalog = InMemoryProductRepository::new();
    let keyboard = seed(&catalog, "Keyboard", 79.99, 10).await;
    let service = OrderService::new(InMemoryOrderRepository::new(catalog));
    let app = handlers::router(service).layer(middleware::from_fn_with_state(
        jwt_auth,
        jwt_auth_middleware,
    ));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            serde_json::to_string(&json!({
                "items": [{"product": keyboard.id, "quantity": 1}]
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["user_id"], json!(user_id));
}
