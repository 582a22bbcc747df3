//! JSON extractor that runs `validator` rules after deserialization.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

/// Like [`axum::Json`], but also runs the payload's `Validate` impl and
/// turns both deserialization and validation failures into structured
/// 400 responses.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_response)?;

        value.validate().map_err(|errors| {
            let details: serde_json::Map<String, serde_json::Value> = errors
                .field_errors()
                .iter()
                .map(|(field, errs)| {
                    let messages: Vec<String> = errs
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    (field.to_string(), json!(messages))
                })
                .collect();

            let body = ErrorResponse {
                code: ErrorCode::ValidationError.code(),
                error: ErrorCode::ValidationError.as_str().to_string(),
                message: "Request validation failed".to_string(),
                details: Some(serde_json::Value::Object(details)),
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        })?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection_response(rejection: JsonRejection) -> Response {
    let body = ErrorResponse {
        code: ErrorCode::JsonExtraction.code(),
        error: ErrorCode::JsonExtraction.as_str().to_string(),
        message: rejection.body_text(),
        details: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct CreateThing {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
    }

    #[tokio::test]
    async fn rejects_invalid_payload() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"name":""}"#))
            .unwrap();

        let result = ValidatedJson::<CreateThing>::from_request(req, &()).await;
        let response = result.err().unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn accepts_valid_payload() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"name":"widget"}"#))
            .unwrap();

        let ValidatedJson(value) = ValidatedJson::<CreateThing>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(value.name, "widget");
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"name":"#))
            .unwrap();

        let result = ValidatedJson::<CreateThing>::from_request(req, &()).await;
        assert!(result.is_err());
    }
}
