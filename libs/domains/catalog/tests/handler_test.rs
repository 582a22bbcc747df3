//! Handler tests for the Catalog domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They exercise ONLY the catalog handlers over the in-memory repository,
//! not the full application with routing, auth middleware, etc.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn service_with_repo() -> (ProductService<InMemoryProductRepository>, InMemoryProductRepository) {
    let repo = InMemoryProductRepository::new();
    (ProductService::new(repo.clone()), repo)
}

async fn seed(service: &ProductService<InMemoryProductRepository>, name: &str, price: f64, stock: i32) -> Product {
    service
        .create_product(CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_product_handler_returns_201() {
    let (service, _repo) = service_with_repo();
    let app = handlers::router(service);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Mechanical Keyboard",
                "description": "Tenkeyless, brown switches",
                "price": 79.99,
                "stock": 25
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Mechanical Keyboard");
    assert_eq!(product.price, 79.99);
    assert_eq!(product.stock, 25);
}

#[tokio::test]
async fn test_create_product_handler_validates_input() {
    let (service, _repo) = service_with_repo();
    let app = handlers::router(service);

    // Negative price is invalid
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Bad Product",
                "price": -5.0,
                "stock": 1
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_handler_returns_200() {
    let (service, _repo) = service_with_repo();
    let created = seed(&service, "Wireless Mouse", 29.99, 40).await;
    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.id, created.id);
    assert_eq!(product.name, "Wireless Mouse");
}

#[tokio::test]
async fn test_get_product_handler_returns_404_for_missing() {
    let (service, _repo) = service_with_repo();
    let app = handlers::router(service);

    let missing_id = uuid::Uuid::now_v7();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", missing_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_product_handler_rejects_bad_uuid() {
    let (service, _repo) = service_with_repo();
    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_handler_with_filters() {
    let (service, _repo) = service_with_repo();
    seed(&service, "Mechanical Keyboard", 79.99, 25).await;
    seed(&service, "Wireless Keyboard", 49.99, 30).await;
    seed(&service, "Wireless Mouse", 29.99, 40).await;

    let app = handlers::router(service);

    // Case-insensitive substring + price range combined
    let request = Request::builder()
        .method("GET")
        .uri("/?search=keyboard&min_price=50")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Mechanical Keyboard");
}

#[tokio::test]
async fn test_patch_product_handler_partial_update() {
    let (service, _repo) = service_with_repo();
    let created = seed(&service, "Widget", 10.0, 5).await;
    let app = handlers::router(service);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/{}", created.id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "price": 12.5 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.price, 12.5);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.stock, 5);
}

#[tokio::test]
async fn test_delete_product_handler_returns_204() {
    let (service, repo) = service_with_repo();
    let created = seed(&service, "Doomed", 1.0, 1).await;
    let app = handlers::router(service);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    use domain_catalog::repository::ProductRepository;
    assert!(repo.get_by_id(created.id).await.unwrap().is_none());
}
