//! Handler tests for registration and token issuance

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_users::auth_handlers::{self, AuthState};
use domain_users::{InMemoryUserRepository, UserService};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn test_app() -> (axum::Router, JwtAuth) {
    let jwt_auth = JwtAuth::new(&JwtConfig::new("test-secret-key-with-enough-entropy!"));
    let state = AuthState {
        service: UserService::new(InMemoryUserRepository::new()),
        jwt_auth: jwt_auth.clone(),
    };
    (auth_handlers::router(state), jwt_auth)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_register_returns_201_without_password() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json(
            "/register",
            json!({
                "email": "buyer@example.com",
                "password": "correct horse battery staple",
                "name": "Buyer"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["email"], "buyer@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_invalid_email_returns_400() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json(
            "/register",
            json!({
                "email": "not-an-email",
                "password": "correct horse battery staple",
                "name": "Buyer"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let (app, _) = test_app();
    let request_body = json!({
        "email": "buyer@example.com",
        "password": "correct horse battery staple",
        "name": "Buyer"
    });

    let first = app
        .clone()
        .oneshot(post_json("/register", request_body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/register", request_body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_token_issued_for_valid_credentials() {
    let (app, jwt_auth) = test_app();

    let register = app
        .clone()
        .oneshot(post_json(
            "/register",
            json!({
                "email": "buyer@example.com",
                "password": "correct horse battery staple",
                "name": "Buyer"
            }),
        ))
        .await
        .unwrap();
    let registered = json_body(register.into_body()).await;

    let response = app
        .oneshot(post_json(
            "/token",
            json!({
                "email": "buyer@example.com",
                "password": "correct horse battery staple"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["user_id"], registered["id"]);
    assert_eq!(body["email"], "buyer@example.com");

    // The issued token verifies and carries the user id as subject
    let claims = jwt_auth
        .verify_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, registered["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_token_rejected_for_bad_credentials() {
    let (app, _) = test_app();

    let register = app
        .clone()
        .oneshot(post_json(
            "/register",
            json!({
                "email": "buyer@example.com",
                "password": "correct horse battery staple",
                "name": "Buyer"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(register.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/token",
            json!({
                "email": "buyer@example.com",
                "password": "wrong password"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        json!("Unable to log in with provided credentials.")
    );
}
