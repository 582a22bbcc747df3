use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// List products with optional filters
    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>>;

    /// Update an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Atomically validate and decrement stock for a set of order lines.
    ///
    /// Lines are processed in submission order under a single write lock:
    /// each product must exist, its quantity must be positive, and enough
    /// stock must remain once earlier lines for the same product are
    /// accounted for. On any failure nothing
    /// is decremented. On success returns a snapshot of each line's product
    /// (name and unit price as they were when the stock was taken).
    pub async fn reserve_stock(&self, lines: &[(Uuid, i32)]) -> CatalogResult<Vec<Product>> {
        let mut products = self.products.write().await;

        // Validate every line before mutating anything
        let mut reserved: HashMap<Uuid, i32> = HashMap::new();
        let mut snapshots = Vec::with_capacity(lines.len());

        for &(product_id, quantity) in lines {
            let product = products
                .get(&product_id)
                .ok_or(CatalogError::NotFound(product_id))?;

            if quantity <= 0 {
                return Err(CatalogError::NonPositiveQuantity(product.name.clone()));
            }

            let already_reserved = reserved.get(&product_id).copied().unwrap_or(0);
            let available = product.stock - already_reserved;

            if quantity > available {
                return Err(CatalogError::InsufficientStock {
                    name: product.name.clone(),
                    available,
                    requested: quantity,
                });
            }

            *reserved.entry(product_id).or_insert(0) += quantity;
            snapshots.push(product.clone());
        }

        // All lines are valid, apply the decrements
        for (product_id, quantity) in reserved {
            if let Some(product) = products.get_mut(&product_id) {
                product.stock -= quantity;
                product.updated_at = chrono::Utc::now();
            }
        }

        Ok(snapshots)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let product = Product::new(input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| p.matches(&filter))
            .cloned()
            .collect();

        // Sort by created_at descending (newest first)
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // Apply pagination
        let result: Vec<Product> = result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str, price: f64, stock: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let repo = InMemoryProductRepository::new();

        let product = repo
            .create(create_input("Mechanical Keyboard", 79.99, 25))
            .await
            .unwrap();
        assert_eq!(product.name, "Mechanical Keyboard");

        let fetched = repo.get_by_id(product.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, product.id);
    }

    #[tokio::test]
    async fn test_list_with_search_filter() {
        let repo = InMemoryProductRepository::new();
        repo.create(create_input("Mechanical Keyboard", 79.99, 25))
            .await
            .unwrap();
        repo.create(create_input("Wireless Mouse", 29.99, 40))
            .await
            .unwrap();

        let filter = ProductFilter {
            search: Some("keyboard".to_string()),
            ..Default::default()
        };
        let result = repo.list(filter).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Mechanical Keyboard");
    }

    #[tokio::test]
    async fn test_list_with_price_range() {
        let repo = InMemoryProductRepository::new();
        repo.create(create_input("Cheap", 5.0, 1)).await.unwrap();
        repo.create(create_input("Mid", 50.0, 1)).await.unwrap();
        repo.create(create_input("Pricey", 500.0, 1)).await.unwrap();

        let filter = ProductFilter {
            min_price: Some(10.0),
            max_price: Some(100.0),
            ..Default::default()
        };
        let result = repo.list(filter).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Mid");
    }

    #[tokio::test]
    async fn test_update_missing_product_fails() {
        let repo = InMemoryProductRepository::new();
        let result = repo.update(Uuid::now_v7(), UpdateProduct::default()).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(create_input("Widget", 1.0, 1)).await.unwrap();

        assert!(repo.delete(product.id).await.unwrap());
        assert!(!repo.delete(product.id).await.unwrap());
        assert!(repo.get_by_id(product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reserve_stock_decrements() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(create_input("A", 10.0, 10)).await.unwrap();
        let b = repo.create(create_input("B", 20.0, 5)).await.unwrap();

        let snapshots = repo.reserve_stock(&[(a.id, 2), (b.id, 1)]).await.unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].price, 10.0);

        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().stock, 8);
        assert_eq!(repo.get_by_id(b.id).await.unwrap().unwrap().stock, 4);
    }

    #[tokio::test]
    async fn test_reserve_stock_insufficient_leaves_stock_unchanged() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(create_input("A", 10.0, 10)).await.unwrap();
        let b = repo.create(create_input("B", 20.0, 5)).await.unwrap();

        let result = repo.reserve_stock(&[(a.id, 2), (b.id, 6)]).await;
        assert!(matches!(
            result,
            Err(CatalogError::InsufficientStock { .. })
        ));

        // Nothing was decremented, including the valid first line
        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().stock, 10);
        assert_eq!(repo.get_by_id(b.id).await.unwrap().unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_reserve_stock_rejects_non_positive_quantity() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(create_input("A", 10.0, 10)).await.unwrap();

        let result = repo.reserve_stock(&[(a.id, 0)]).await;
        match result {
            Err(CatalogError::NonPositiveQuantity(name)) => assert_eq!(name, "A"),
            other => panic!("expected NonPositiveQuantity, got {:?}", other.map(|_| ())),
        }
        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_reserve_stock_duplicate_lines_are_cumulative() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(create_input("A", 10.0, 10)).await.unwrap();

        // 6 + 6 exceeds stock of 10 even though each line alone fits
        let result = repo.reserve_stock(&[(a.id, 6), (a.id, 6)]).await;
        match result {
            Err(CatalogError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 4);
                assert_eq!(requested, 6);
            }
            other => panic!("expected InsufficientStock, got {:?}", other.map(|_| ())),
        }

        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_reserve_stock_unknown_product() {
        let repo = InMemoryProductRepository::new();
        let result = repo.reserve_stock(&[(Uuid::now_v7(), 1)]).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
