//! Session-scoped wishlist service.
//!
//! Same shape as the cart service, minus quantities: one entry per
//! (session, product), enforced by check-then-insert.

use serde_json::json;
use tracing::instrument;

use savanna_core::{ProductId, SessionToken};

use crate::models::WishlistEntry;
use crate::store::{Filter, Query, StoreError, TabularStore};

/// Table holding wishlist entries.
pub const WISHLIST_TABLE: &str = "wishlist_items";

/// Wishlist operations for one remote store.
pub struct WishlistService<'a, S> {
    store: &'a S,
}

impl<'a, S: TabularStore> WishlistService<'a, S> {
    /// Create a service over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All wishlist entries for the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    pub async fn items(
        &self,
        session: &SessionToken,
    ) -> Result<Vec<WishlistEntry>, StoreError> {
        let rows = self
            .store
            .select(
                WISHLIST_TABLE,
                Query::new().eq("user_session_id", session.as_str()),
            )
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    /// Add a product to the wishlist.
    ///
    /// Idempotent: if an entry already exists for (session, product), it is
    /// returned unchanged instead of erroring or duplicating.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup or insert fails.
    #[instrument(skip(self, session))]
    pub async fn add(
        &self,
        session: &SessionToken,
        product_id: &ProductId,
    ) -> Result<WishlistEntry, StoreError> {
        let existing = self
            .store
            .select_maybe_single(
                WISHLIST_TABLE,
                Query::new()
                    .eq("user_session_id", session.as_str())
                    .eq("product_id", product_id.as_str()),
            )
            .await?;

        if let Some(row) = existing {
            return Ok(serde_json::from_value(row)?);
        }

        let row = self
            .store
            .insert(
                WISHLIST_TABLE,
                json!({
                    "user_session_id": session.as_str(),
                    "product_id": product_id.as_str(),
                }),
            )
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Remove a product from the wishlist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete request fails.
    pub async fn remove(
        &self,
        session: &SessionToken,
        product_id: &ProductId,
    ) -> Result<(), StoreError> {
        self.store
            .delete(
                WISHLIST_TABLE,
                vec![
                    Filter::eq("user_session_id", session.as_str()),
                    Filter::eq("product_id", product_id.as_str()),
                ],
            )
            .await
    }

    /// Is the product currently wishlisted for this session?
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    pub async fn contains(
        &self,
        session: &SessionToken,
        product_id: &ProductId,
    ) -> Result<bool, StoreError> {
        let existing = self
            .store
            .select_maybe_single(
                WISHLIST_TABLE,
                Query::new()
                    .eq("user_session_id", session.as_str())
                    .eq("product_id", product_id.as_str()),
            )
            .await?;
        Ok(existing.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> SessionToken {
        SessionToken::new("session_1700000000000_testtoken")
    }

    #[tokio::test]
    async fn test_double_add_returns_same_entry() {
        let store = MemoryStore::new();
        let wishlist = WishlistService::new(&store);
        let session = session();
        let product = ProductId::new("p1");

        let first = wishlist.add(&session, &product).await.expect("first add");
        let second = wishlist.add(&session, &product).await.expect("second add");

        assert_eq!(first.id, second.id);
        assert_eq!(store.row_count(WISHLIST_TABLE), 1);
    }

    #[tokio::test]
    async fn test_contains_reflects_add_and_remove() {
        let store = MemoryStore::new();
        let wishlist = WishlistService::new(&store);
        let session = session();
        let product = ProductId::new("p1");

        assert!(!wishlist.contains(&session, &product).await.expect("empty"));

        wishlist.add(&session, &product).await.expect("add");
        assert!(wishlist.contains(&session, &product).await.expect("added"));

        wishlist.remove(&session, &product).await.expect("remove");
        assert!(
            !wishlist
                .contains(&session, &product)
                .await
                .expect("removed")
        );

        // Removing again is a no-op, not an error.
        wishlist
            .remove(&session, &product)
            .await
            .expect("second remove");
    }

    #[tokio::test]
    async fn test_items_scoped_to_session() {
        let store = MemoryStore::new();
        let wishlist = WishlistService::new(&store);

        let alice = SessionToken::new("session_1_alice0000");
        let bob = SessionToken::new("session_2_bob000000");

        wishlist
            .add(&alice, &ProductId::new("p1"))
            .await
            .expect("alice p1");
        wishlist
            .add(&alice, &ProductId::new("p2"))
            .await
            .expect("alice p2");
        wishlist
            .add(&bob, &ProductId::new("p3"))
            .await
            .expect("bob p3");

        assert_eq!(wishlist.items(&alice).await.expect("alice items").len(), 2);
        assert_eq!(wishlist.items(&bob).await.expect("bob items").len(), 1);
    }
}
