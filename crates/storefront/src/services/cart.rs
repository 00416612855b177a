//! Session-scoped cart service.
//!
//! Every operation is keyed by an explicitly supplied
//! [`SessionToken`] and runs as a discrete request against the remote store,
//! which remains the sole source of truth. There is no local cache and no
//! transaction: the add operation's read-then-write is two requests, so two
//! concurrent adds for the same (session, product, size, color) tuple can
//! race and leave duplicate lines. The service does not guard against that
//! race; an anonymous storefront tolerates the occasional duplicate line.

use serde_json::json;
use tracing::instrument;

use savanna_core::{CartItemId, ProductId, SessionToken};

use crate::models::{CartLine, CartLineDetail, Product};
use crate::store::{Query, StoreError, TabularStore};

use super::catalog::PRODUCTS_TABLE;

/// Table holding cart lines.
pub const CART_TABLE: &str = "cart_items";

/// Cart operations for one remote store.
pub struct CartService<'a, S> {
    store: &'a S,
}

impl<'a, S: TabularStore> CartService<'a, S> {
    /// Create a service over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All cart lines for the session. No ordering guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the underlying query fails.
    pub async fn items(&self, session: &SessionToken) -> Result<Vec<CartLine>, StoreError> {
        let rows = self
            .store
            .select(
                CART_TABLE,
                Query::new().eq("user_session_id", session.as_str()),
            )
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    /// Add `quantity` of a product variant to the cart, merging with an
    /// existing line for the same (session, product, size, color) tuple.
    ///
    /// Absent size/color normalize to `""` for both matching and storage, so
    /// "no color selected" and a literal empty-string color are the same
    /// line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup, insert, or merge update fails.
    #[instrument(skip(self, session))]
    pub async fn add(
        &self,
        session: &SessionToken,
        product_id: &ProductId,
        quantity: i64,
        selected_size: Option<&str>,
        selected_color: Option<&str>,
    ) -> Result<CartLine, StoreError> {
        let size = selected_size.unwrap_or("");
        let color = selected_color.unwrap_or("");

        let existing = self
            .store
            .select_maybe_single(
                CART_TABLE,
                Query::new()
                    .eq("user_session_id", session.as_str())
                    .eq("product_id", product_id.as_str())
                    .eq("selected_size", size)
                    .eq("selected_color", color),
            )
            .await?;

        if let Some(row) = existing {
            let line: CartLine = serde_json::from_value(row)?;
            return self
                .update_quantity(&line.id, line.quantity + quantity)
                .await;
        }

        let row = self
            .store
            .insert(
                CART_TABLE,
                json!({
                    "user_session_id": session.as_str(),
                    "product_id": product_id.as_str(),
                    "quantity": quantity,
                    "selected_size": size,
                    "selected_color": color,
                }),
            )
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Unconditionally overwrite a line's quantity.
    ///
    /// No lower bound is enforced here: removal-on-zero is the HTTP caller's
    /// policy, not a cart invariant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RowNotFound`] for an unknown line id, or any
    /// other [`StoreError`] from the update.
    pub async fn update_quantity(
        &self,
        id: &CartItemId,
        quantity: i64,
    ) -> Result<CartLine, StoreError> {
        let row = self
            .store
            .update(
                CART_TABLE,
                json!({ "quantity": quantity }),
                vec![crate::store::Filter::eq("id", id.as_str())],
            )
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Delete a line by id. Idempotent: deleting an unknown id succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete request itself fails.
    pub async fn remove(&self, id: &CartItemId) -> Result<(), StoreError> {
        self.store
            .delete(
                CART_TABLE,
                vec![crate::store::Filter::eq("id", id.as_str())],
            )
            .await
    }

    /// Delete every line for the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete request fails.
    pub async fn clear(&self, session: &SessionToken) -> Result<(), StoreError> {
        self.store
            .delete(
                CART_TABLE,
                vec![crate::store::Filter::eq(
                    "user_session_id",
                    session.as_str(),
                )],
            )
            .await
    }

    /// Sum of quantities across the session's lines.
    ///
    /// Naive re-fetch on every call; the store is the only source of truth.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the fetch fails.
    pub async fn count(&self, session: &SessionToken) -> Result<i64, StoreError> {
        let items = self.items(session).await?;
        Ok(items.iter().map(|line| line.quantity).sum())
    }

    /// Cart lines hydrated with their product rows.
    ///
    /// A line whose product has vanished from the catalog hydrates with
    /// `product: None` rather than failing the whole cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when any fetch fails.
    pub async fn items_with_products(
        &self,
        session: &SessionToken,
    ) -> Result<Vec<CartLineDetail>, StoreError> {
        let lines = self.items(session).await?;
        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            let product = self
                .store
                .select_maybe_single(
                    PRODUCTS_TABLE,
                    Query::new().eq("id", line.product_id.as_str()),
                )
                .await?
                .map(serde_json::from_value::<Product>)
                .transpose()?;
            details.push(CartLineDetail { line, product });
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> SessionToken {
        SessionToken::new("session_1700000000000_testtoken")
    }

    async fn seed_product(store: &MemoryStore, id: &str, price: i64) {
        store
            .insert(
                PRODUCTS_TABLE,
                json!({
                    "id": id,
                    "name": format!("Product {id}"),
                    "category": "unisex",
                    "price": price,
                    "in_stock": true,
                }),
            )
            .await
            .expect("seed product");
    }

    #[tokio::test]
    async fn test_add_then_add_merges_quantities() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);
        let session = session();
        let product = ProductId::new("p1");

        cart.add(&session, &product, 2, Some("M"), Some("Red"))
            .await
            .expect("first add");
        let merged = cart
            .add(&session, &product, 3, Some("M"), Some("Red"))
            .await
            .expect("second add");

        assert_eq!(merged.quantity, 5);
        assert_eq!(store.row_count(CART_TABLE), 1);
    }

    #[tokio::test]
    async fn test_variants_get_distinct_lines() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);
        let session = session();
        let product = ProductId::new("p1");

        cart.add(&session, &product, 1, Some("M"), Some("Red"))
            .await
            .expect("add M");
        cart.add(&session, &product, 1, Some("L"), Some("Red"))
            .await
            .expect("add L");

        assert_eq!(store.row_count(CART_TABLE), 2);
    }

    #[tokio::test]
    async fn test_absent_variant_matches_empty_string() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);
        let session = session();
        let product = ProductId::new("p1");

        cart.add(&session, &product, 1, None, None)
            .await
            .expect("add without variant");
        let merged = cart
            .add(&session, &product, 1, Some(""), Some(""))
            .await
            .expect("add with literal empty variant");

        // Deliberate collision: "no color" and a literal "" color are the
        // same canonical line.
        assert_eq!(merged.quantity, 2);
        assert_eq!(store.row_count(CART_TABLE), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);
        let product = ProductId::new("p1");

        let alice = SessionToken::new("session_1_alice0000");
        let bob = SessionToken::new("session_2_bob000000");

        cart.add(&alice, &product, 1, None, None)
            .await
            .expect("alice add");
        cart.add(&bob, &product, 4, None, None)
            .await
            .expect("bob add");

        assert_eq!(cart.count(&alice).await.expect("alice count"), 1);
        assert_eq!(cart.count(&bob).await.expect("bob count"), 4);
    }

    #[tokio::test]
    async fn test_count_tracks_mutations() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);
        let session = session();

        let line = cart
            .add(&session, &ProductId::new("p1"), 2, Some("M"), None)
            .await
            .expect("add p1");
        cart.add(&session, &ProductId::new("p2"), 1, None, None)
            .await
            .expect("add p2");
        assert_eq!(cart.count(&session).await.expect("count"), 3);

        cart.update_quantity(&line.id, 5).await.expect("update");
        assert_eq!(cart.count(&session).await.expect("count"), 6);

        cart.remove(&line.id).await.expect("remove");
        assert_eq!(cart.count(&session).await.expect("count"), 1);

        cart.clear(&session).await.expect("clear");
        assert_eq!(cart.count(&session).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_idempotent() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);

        cart.remove(&CartItemId::new("never-existed"))
            .await
            .expect("removing an unknown line does not error");
    }

    #[tokio::test]
    async fn test_update_quantity_has_no_lower_bound() {
        let store = MemoryStore::new();
        let cart = CartService::new(&store);
        let session = session();

        let line = cart
            .add(&session, &ProductId::new("p1"), 2, None, None)
            .await
            .expect("add");
        let updated = cart.update_quantity(&line.id, 0).await.expect("update");

        // Removal-on-zero is the caller's policy, not the service's.
        assert_eq!(updated.quantity, 0);
        assert_eq!(store.row_count(CART_TABLE), 1);
    }

    #[tokio::test]
    async fn test_items_with_products_hydrates_and_tolerates_gaps() {
        let store = MemoryStore::new();
        seed_product(&store, "p1", 1000).await;
        let cart = CartService::new(&store);
        let session = session();

        cart.add(&session, &ProductId::new("p1"), 2, None, None)
            .await
            .expect("add live product");
        cart.add(&session, &ProductId::new("p-deleted"), 1, None, None)
            .await
            .expect("add dangling product");

        let details = cart
            .items_with_products(&session)
            .await
            .expect("hydrate");
        assert_eq!(details.len(), 2);

        let live = details
            .iter()
            .find(|d| d.line.product_id.as_str() == "p1")
            .expect("live line");
        assert_eq!(live.subtotal(), rust_decimal::Decimal::from(1000));

        let dangling = details
            .iter()
            .find(|d| d.line.product_id.as_str() == "p-deleted")
            .expect("dangling line");
        assert!(dangling.product.is_none());
        assert_eq!(dangling.subtotal(), rust_decimal::Decimal::ZERO);
    }
}
