//! Orders Domain
//!
//! Order placement over the product catalog. The whole point of this domain
//! is the placement transaction: validate every line of an incoming order,
//! snapshot unit prices, create the order with its items, and decrement
//! product stock - atomically, so concurrent orders can never oversell.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::repository::InMemoryProductRepository;
//! use domain_orders::{handlers, repository::InMemoryOrderRepository, service::OrderService};
//!
//! let catalog = InMemoryProductRepository::new();
//! let repository = InMemoryOrderRepository::new(catalog);
//! let service = OrderService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{OrderError, OrderResult};
pub use models::{CreateOrder, Order, OrderItem, OrderItemRequest, OrderResponse, OrderStatus};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
