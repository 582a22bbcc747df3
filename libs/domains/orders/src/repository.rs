use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain_catalog::repository::InMemoryProductRepository;

use crate::error::OrderResult;
use crate::models::{Order, OrderItem, OrderItemRequest, OrderResponse, OrderStatus};

/// Repository trait for order placement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Place an order: validate every line, snapshot prices, create the
    /// order with its items and decrement stock - atomically. On failure
    /// nothing is persisted and no stock changes.
    async fn place(
        &self,
        user_id: Uuid,
        items: Vec<OrderItemRequest>,
    ) -> OrderResult<OrderResponse>;

    /// Get a placed order by ID
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<OrderResponse>>;
}

/// In-memory implementation of OrderRepository, backed by the shared
/// in-memory product store (for development/testing)
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, OrderResponse>>>,
    catalog: InMemoryProductRepository,
}

impl InMemoryOrderRepository {
    pub fn new(catalog: InMemoryProductRepository) -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
            catalog,
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn place(
        &self,
        user_id: Uuid,
        items: Vec<OrderItemRequest>,
    ) -> OrderResult<OrderResponse> {
        // Validation (existence, quantity, stock - per line in submission
        // order) and the decrement happen under one write lock over the
        // product store; on failure nothing is decremented.
        let lines: Vec<(Uuid, i32)> = items.iter().map(|l| (l.product, l.quantity)).collect();
        let snapshots = self.catalog.reserve_stock(&lines).await?;

        let total_price: f64 = items
            .iter()
            .zip(&snapshots)
            .map(|(line, product)| product.price * line.quantity as f64)
            .sum();

        let order = Order {
            id: Uuid::now_v7(),
            user_id,
            order_date: chrono::Utc::now(),
            status: OrderStatus::Pending,
            total_price,
        };

        let order_items: Vec<OrderItem> = items
            .iter()
            .zip(&snapshots)
            .map(|(line, product)| OrderItem {
                id: Uuid::now_v7(),
                order_id: order.id,
                product_id: line.product,
                quantity: line.quantity,
                price: product.price,
            })
            .collect();

        let response = OrderResponse {
            order,
            items: order_items,
        };

        let mut orders = self.orders.write().await;
        orders.insert(response.order.id, response.clone());

        tracing::info!(
            order_id = %response.order.id,
            total_price = response.order.total_price,
            "Placed order"
        );
        Ok(response)
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<OrderResponse>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }
}
