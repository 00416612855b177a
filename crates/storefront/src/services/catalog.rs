//! Product catalog reads.
//!
//! Products are read-only from the storefront, so responses are cached with
//! `moka` (5-minute TTL) and invalidated by time alone. Search is a
//! case-insensitive substring match applied in-process over the in-stock
//! rows - the catalog is small enough that the thin query client never grew
//! a server-side search.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use savanna_core::{Category, ProductId};

use crate::models::Product;
use crate::store::{Query, StoreError, TabularStore};

/// Table holding the product catalog.
pub const PRODUCTS_TABLE: &str = "products";

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(String),
    Category {
        category: Category,
        limit: Option<u32>,
    },
    Featured {
        limit: Option<u32>,
    },
    InStock,
}

/// Cached value types.
#[derive(Clone)]
enum CacheValue {
    Product(Arc<Option<Product>>),
    Products(Arc<Vec<Product>>),
}

/// Cached catalog reads over one remote store.
#[derive(Clone)]
pub struct CatalogService<S> {
    store: S,
    cache: Cache<CacheKey, CacheValue>,
}

impl<S: TabularStore + Clone + 'static> CatalogService<S> {
    /// Create a catalog service over `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { store, cache }
    }

    /// One product by id; `None` when absent from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let key = CacheKey::Product(id.as_str().to_owned());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            return Ok((*product).clone());
        }

        let product = self
            .store
            .select_maybe_single(PRODUCTS_TABLE, Query::new().eq("id", id.as_str()))
            .await?
            .map(serde_json::from_value::<Product>)
            .transpose()?;

        self.cache
            .insert(key, CacheValue::Product(Arc::new(product.clone())))
            .await;
        Ok(product)
    }

    /// In-stock products of one category, ordered by `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    pub async fn by_category(
        &self,
        category: Category,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, StoreError> {
        let key = CacheKey::Category { category, limit };
        let mut query = Query::new()
            .eq("category", category.as_str())
            .eq("in_stock", true)
            .order_asc("sort_order");
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.cached_list(key, query).await
    }

    /// In-stock featured products, ordered by `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    pub async fn featured(&self, limit: Option<u32>) -> Result<Vec<Product>, StoreError> {
        let key = CacheKey::Featured { limit };
        let mut query = Query::new()
            .eq("featured", true)
            .eq("in_stock", true)
            .order_asc("sort_order");
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.cached_list(key, query).await
    }

    /// Every in-stock product, ordered by `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    pub async fn in_stock(&self) -> Result<Vec<Product>, StoreError> {
        self.cached_list(
            CacheKey::InStock,
            Query::new().eq("in_stock", true).order_asc("sort_order"),
        )
        .await
    }

    /// Case-insensitive substring search over in-stock products.
    ///
    /// A blank query matches everything.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the underlying fetch fails.
    pub async fn search(&self, needle: &str) -> Result<Vec<Product>, StoreError> {
        let products = self.in_stock().await?;
        let needle = needle.trim();
        if needle.is_empty() {
            return Ok(products);
        }
        Ok(products
            .into_iter()
            .filter(|p| p.matches_search(needle))
            .collect())
    }

    async fn cached_list(
        &self,
        key: CacheKey,
        query: Query,
    ) -> Result<Vec<Product>, StoreError> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            return Ok((*products).clone());
        }

        let products: Vec<Product> = self
            .store
            .select(PRODUCTS_TABLE, query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect::<Result<_, _>>()?;

        self.cache
            .insert(key, CacheValue::Products(Arc::new(products.clone())))
            .await;
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        let rows = [
            json!({"id": "p1", "name": "Ankara Shirt", "category": "men", "price": 2000, "in_stock": true, "sort_order": 2}),
            json!({"id": "p2", "name": "Kitenge Dress", "category": "women", "price": 3500, "in_stock": true, "sort_order": 1, "featured": true}),
            json!({"id": "p3", "name": "Safari Jacket", "category": "men", "price": 4200, "in_stock": false, "sort_order": 1}),
            json!({"id": "p4", "name": "Beaded Hoodie", "category": "unisex", "price": 2600, "in_stock": true, "sort_order": 3, "description": "Heavy cotton hoodie"}),
        ];
        for row in rows {
            store.insert(PRODUCTS_TABLE, row).await.expect("seed");
        }
        store
    }

    #[tokio::test]
    async fn test_by_category_filters_stock_and_orders() {
        let catalog = CatalogService::new(seeded_store().await);
        let men = catalog
            .by_category(Category::Men, Some(8))
            .await
            .expect("men");

        // p3 is out of stock and must not appear.
        assert_eq!(men.len(), 1);
        assert_eq!(men[0].id.as_str(), "p1");
    }

    #[tokio::test]
    async fn test_featured_only() {
        let catalog = CatalogService::new(seeded_store().await);
        let featured = catalog.featured(None).await.expect("featured");
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id.as_str(), "p2");
    }

    #[tokio::test]
    async fn test_get_hits_cache_after_first_read() {
        let store = seeded_store().await;
        let catalog = CatalogService::new(store.clone());
        let id = ProductId::new("p1");

        let first = catalog.get(&id).await.expect("first get");
        assert!(first.is_some());

        // Remove the row under the cache; the cached value still answers.
        store
            .delete(PRODUCTS_TABLE, vec![crate::store::Filter::eq("id", "p1")])
            .await
            .expect("delete");
        let second = catalog.get(&id).await.expect("second get");
        assert!(second.is_some());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_description() {
        let catalog = CatalogService::new(seeded_store().await);

        let hits = catalog.search("kitenge").await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "p2");

        let hits = catalog.search("cotton").await.expect("search description");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "p4");

        // Out-of-stock products never surface in search.
        let hits = catalog.search("safari").await.expect("search oos");
        assert!(hits.is_empty());

        // Blank query returns the whole in-stock catalog.
        let hits = catalog.search("  ").await.expect("blank search");
        assert_eq!(hits.len(), 3);
    }
}
