use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_catalog::CatalogError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("An order should contain at least one item.")]
    EmptyOrder,

    #[error("Quantity must be positive for {0}")]
    NonPositiveQuantity(String),

    #[error("Invalid pk \"{0}\" - object does not exist.")]
    ProductNotFound(Uuid),

    #[error("Insufficient stock for {name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i32,
        requested: i32,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// All order validation failures are client errors; nothing is committed
/// when one is raised.
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyOrder
            | OrderError::NonPositiveQuantity(_)
            | OrderError::ProductNotFound(_)
            | OrderError::InsufficientStock { .. } => AppError::BadRequest(err.to_string()),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Map catalog failures surfaced during stock reservation
impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => OrderError::ProductNotFound(id),
            CatalogError::NonPositiveQuantity(name) => OrderError::NonPositiveQuantity(name),
            CatalogError::InsufficientStock {
                name,
                available,
                requested,
            } => OrderError::InsufficientStock {
                name,
                available,
                requested,
            },
            CatalogError::Validation(msg) | CatalogError::Internal(msg) => {
                OrderError::Internal(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_match_api_contract() {
        assert_eq!(
            OrderError::EmptyOrder.to_string(),
            "An order should contain at least one item."
        );
        assert_eq!(
            OrderError::NonPositiveQuantity("Widget".to_string()).to_string(),
            "Quantity must be positive for Widget"
        );
        assert_eq!(
            OrderError::InsufficientStock {
                name: "Widget".to_string(),
                available: 10,
                requested: 11,
            }
            .to_string(),
            "Insufficient stock for Widget. Available: 10, Requested: 11"
        );
    }
}
