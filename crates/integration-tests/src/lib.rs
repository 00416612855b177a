//! Integration tests for Savanna Threads.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p savanna-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - Cart scenarios end to end against the in-memory store
//! - `wishlist_flow` - Wishlist membership scenarios
//! - `session_http` - Session cookie behaviour through the HTTP middleware
//!
//! The helpers here seed an in-memory store with a fixed catalog so the test
//! files can exercise the services the way the HTTP handlers drive them,
//! without a network or a hosted data service.

use serde_json::json;

use savanna_core::SessionToken;
use savanna_storefront::services::catalog::PRODUCTS_TABLE;
use savanna_storefront::store::{MemoryStore, TabularStore};

/// Fixed catalog: (id, name, category, price, featured).
pub const SEED_PRODUCTS: &[(&str, &str, &str, i64, bool)] = &[
    ("p-shirt", "Maasai Print Shirt", "men", 1999, true),
    ("p-dress", "Kitenge Wrap Dress", "women", 2499, true),
    ("p-tee", "Nairobi Skyline Tee", "unisex", 899, false),
];

/// A store pre-loaded with [`SEED_PRODUCTS`].
///
/// # Panics
///
/// Panics if seeding fails, which would make every test meaningless anyway.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (index, (id, name, category, price, featured)) in SEED_PRODUCTS.iter().enumerate() {
        store
            .insert(
                PRODUCTS_TABLE,
                json!({
                    "id": id,
                    "name": name,
                    "category": category,
                    "price": price,
                    "featured": featured,
                    "in_stock": true,
                    "sort_order": index + 1,
                }),
            )
            .await
            .expect("seed product");
    }
    store
}

/// A deterministic session token for tests.
#[must_use]
pub fn test_session(label: &str) -> SessionToken {
    SessionToken::new(format!("session_1700000000000_{label}"))
}
