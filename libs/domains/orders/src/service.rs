use std::sync::Arc;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, OrderResponse};
use crate::repository::OrderRepository;

/// Service layer for order placement
#[derive(Clone)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Place an order for the authenticated user.
    ///
    /// The order must contain at least one item; everything else (product
    /// existence, quantities, stock) is validated atomically by the
    /// repository.
    pub async fn place_order(
        &self,
        user_id: Uuid,
        order: CreateOrder,
    ) -> OrderResult<OrderResponse> {
        if order.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        self.repository.place(user_id, order.items).await
    }

    pub async fn get_order(&self, id: Uuid) -> OrderResult<Option<OrderResponse>> {
        self.repository.get_by_id(id).await
    }
}
