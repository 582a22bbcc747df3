use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement, TransactionTrait};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderItem, OrderItemRequest, OrderResponse, OrderStatus};
use crate::repository::OrderRepository;

/// PostgreSQL implementation of OrderRepository using SeaORM
#[derive(Clone)]
pub struct PgOrderRepository {
    db: sea_orm::DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Product row locked for the duration of the placement transaction
#[derive(Debug, FromQueryResult)]
struct LockedProductRow {
    id: Uuid,
    name: String,
    price: f64,
    stock: i32,
}

#[derive(Debug, FromQueryResult)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    order_date: chrono::DateTime<chrono::Utc>,
    status: String,
    total_price: f64,
}

#[derive(Debug, FromQueryResult)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    price: f64,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        use std::str::FromStr;

        let status = OrderStatus::from_str(&row.status)
            .map_err(|_| OrderError::Internal(format!("Unknown order status: {}", row.status)))?;

        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            order_date: row.order_date,
            status,
            total_price: row.total_price,
        })
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn place(
        &self,
        user_id: Uuid,
        items: Vec<OrderItemRequest>,
    ) -> OrderResult<OrderResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

        // Lock all referenced products at once. Ordering by id keeps the
        // lock acquisition order identical across concurrent placements,
        // which rules out deadlocks between them.
        let product_ids: Vec<Uuid> = items.iter().map(|l| l.product).collect();
        let rows = txn
            .query_all_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                SELECT id, name, price, stock
                FROM products
                WHERE id = ANY($1)
                ORDER BY id
                FOR UPDATE
                "#,
                [product_ids.into()],
            ))
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

        let mut products: HashMap<Uuid, LockedProductRow> = HashMap::new();
        for row in rows {
            let product = LockedProductRow::from_query_result(&row, "")
                .map_err(|e| OrderError::Internal(e.to_string()))?;
            products.insert(product.id, product);
        }

        // Validate every line in submission order before touching state.
        // Availability is tracked cumulatively so repeated lines for the
        // same product cannot oversell it.
        let mut reserved: HashMap<Uuid, i32> = HashMap::new();
        for line in &items {
            let product = products
                .get(&line.product)
                .ok_or(OrderError::ProductNotFound(line.product))?;

            if line.quantity <= 0 {
                return Err(OrderError::NonPositiveQuantity(product.name.clone()));
            }

            let taken = reserved.entry(line.product).or_insert(0);
            let available = product.stock - *taken;
            if available < line.quantity {
                return Err(OrderError::InsufficientStock {
                    name: product.name.clone(),
                    available,
                    requested: line.quantity,
                });
            }
            *taken += line.quantity;
        }

        let total_price: f64 = items
            .iter()
            .map(|line| products[&line.product].price * line.quantity as f64)
            .sum();

        let order = Order {
            id: Uuid::now_v7(),
            user_id,
            order_date: chrono::Utc::now(),
            status: OrderStatus::Pending,
            total_price,
        };

        txn.execute_raw(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO orders (id, user_id, order_date, status, total_price)
            VALUES ($1, $2, $3, CAST($4 AS order_status), $5)
            "#,
            [
                order.id.into(),
                order.user_id.into(),
                order.order_date.into(),
                order.status.to_string().into(),
                order.total_price.into(),
            ],
        ))
        .await
        .map_err(|e| OrderError::Internal(e.to_string()))?;

        let mut order_items = Vec::with_capacity(items.len());
        for line in &items {
            let item = OrderItem {
                id: Uuid::now_v7(),
                order_id: order.id,
                product_id: line.product,
                quantity: line.quantity,
                price: products[&line.product].price,
            };

            txn.execute_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
                [
                    item.id.into(),
                    item.order_id.into(),
                    item.product_id.into(),
                    item.quantity.into(),
                    item.price.into(),
                ],
            ))
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

            // One decrement per line; duplicate lines subtract cumulatively
            txn.execute_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                UPDATE products
                SET stock = stock - $2, updated_at = $3
                WHERE id = $1
                "#,
                [
                    line.product.into(),
                    line.quantity.into(),
                    chrono::Utc::now().into(),
                ],
            ))
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

            order_items.push(item);
        }

        txn.commit()
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total_price = order.total_price,
            "Placed order"
        );

        Ok(OrderResponse {
            order,
            items: order_items,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<OrderResponse>> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                SELECT id, user_id, order_date, status::text AS status, total_price
                FROM orders
                WHERE id = $1
                "#,
                [id.into()],
            ))
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order_row = OrderRow::from_query_result(&row, "")
            .map_err(|e| OrderError::Internal(e.to_string()))?;
        let order = Order::try_from(order_row)?;

        let item_rows = self
            .db
            .query_all_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                SELECT id, order_id, product_id, quantity, price
                FROM order_items
                WHERE order_id = $1
                ORDER BY id
                "#,
                [id.into()],
            ))
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

        let mut items = Vec::with_capacity(item_rows.len());
        for row in item_rows {
            let item_row = OrderItemRow::from_query_result(&row, "")
                .map_err(|e| OrderError::Internal(e.to_string()))?;
            items.push(OrderItem::from(item_row));
        }

        Ok(Some(OrderResponse { order, items }))
    }
}
