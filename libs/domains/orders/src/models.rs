use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed but not yet fulfilled
    #[default]
    Pending,
    /// Order has been fulfilled
    Completed,
    /// Order was cancelled
    Cancelled,
}

/// Order entity - a placed order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,
    /// Owner of the order (the authenticated caller at placement time)
    pub user_id: Uuid,
    /// Placement timestamp
    pub order_date: DateTime<Utc>,
    /// Current status
    pub status: OrderStatus,
    /// Sum of line-item subtotals at placement time
    pub total_price: f64,
}

/// A single order line with its unit price snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    /// Unique identifier
    pub id: Uuid,
    /// Owning order
    pub order_id: Uuid,
    /// Ordered product
    pub product_id: Uuid,
    /// Units ordered (always positive)
    pub quantity: i32,
    /// Unit price at the time the order was placed
    pub price: f64,
}

/// One requested line in an incoming order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    /// Product to order
    pub product: Uuid,
    /// Units to order
    pub quantity: i32,
}

/// DTO for placing a new order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

/// The created order together with its items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
