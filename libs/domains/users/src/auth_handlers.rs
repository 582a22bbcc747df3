use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_helpers::{
    JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
    },
};
use utoipa::OpenApi;

use crate::error::UserError;
use crate::models::{RegisterRequest, TokenRequest, TokenResponse, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "auth";

/// OpenAPI documentation for the Auth API
#[derive(OpenApi)]
#[openapi(
    paths(register, issue_token),
    components(
        schemas(RegisterRequest, TokenRequest, TokenResponse, UserResponse),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Registration and token endpoints")
    )
)]
pub struct ApiDoc;

/// Application state for auth handlers
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtAuth,
}

/// Create the auth router (registration and token issuance, both public)
pub fn router<R: UserRepository + Clone + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(issue_token))
        .with_state(state)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, UserError> {
    let user = state.service.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/token",
    tag = TAG,
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn issue_token<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>, UserError> {
    let user = state
        .service
        .verify_credentials(&input.email, &input.password)
        .await?;

    let token = state
        .jwt_auth
        .create_token(&user.id.to_string(), &user.email, &user.name)
        .map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            UserError::Internal("Failed to create token".to_string())
        })?;

    Ok(Json(TokenResponse {
        token,
        user_id: user.id,
        email: user.email,
    }))
}
