//! Wishlist entry rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use savanna_core::{ProductId, SessionToken, WishlistEntryId};

/// A row of the `wishlist_items` table.
///
/// Invariant (application-enforced): at most one entry per
/// (session, product).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: WishlistEntryId,
    pub user_session_id: SessionToken,
    pub product_id: ProductId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
