use axum::Router;
use axum_helpers::jwt_auth_middleware;

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Auth routes are public; catalog and order routes require a bearer token.
pub fn routes(state: &crate::state::AppState) -> Router {
    let protected = Router::new()
        .nest("/products", products::router(state))
        .nest("/orders", orders::router(state))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_auth.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .nest("/auth", auth::router(state))
        .merge(protected)
}

/// Creates a router with the /ready endpoint that performs actual health checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
