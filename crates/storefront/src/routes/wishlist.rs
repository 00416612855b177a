//! Wishlist route handlers.
//!
//! Membership is keyed on (session, product), so routes address entries by
//! product id rather than entry id. Add and remove are both idempotent.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use savanna_core::ProductId;

use crate::error::Result;
use crate::middleware::SessionIdentity;
use crate::models::WishlistEntry;
use crate::services::WishlistService;
use crate::state::AppState;

/// Membership check response.
#[derive(Debug, Serialize)]
pub struct WishlistStatus {
    pub in_wishlist: bool,
}

/// All wishlist entries for the session.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
) -> Result<Json<Vec<WishlistEntry>>> {
    let wishlist = WishlistService::new(state.store());
    Ok(Json(wishlist.items(&session).await?))
}

/// Whether the product is wishlisted for this session.
#[instrument(skip(state, session))]
pub async fn status(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistStatus>> {
    let wishlist = WishlistService::new(state.store());
    let in_wishlist = wishlist
        .contains(&session, &ProductId::new(product_id))
        .await?;
    Ok(Json(WishlistStatus { in_wishlist }))
}

/// Add a product to the wishlist. Re-adding returns the existing entry.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistEntry>> {
    let wishlist = WishlistService::new(state.store());
    let entry = wishlist.add(&session, &ProductId::new(product_id)).await?;
    Ok(Json(entry))
}

/// Remove a product from the wishlist. Removing an absent product succeeds.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistStatus>> {
    let wishlist = WishlistService::new(state.store());
    wishlist
        .remove(&session, &ProductId::new(product_id))
        .await?;
    Ok(Json(WishlistStatus { in_wishlist: false }))
}
