//! Cart route handlers.
//!
//! Every mutation response carries the updated cart count so clients can
//! keep the badge current from the mutation itself instead of polling.
//! Removal-on-zero lives here, not in the cart service: a quantity below one
//! is this layer's cue to delete the line.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use savanna_core::{CartItemId, ProductId, format_ksh};

use crate::error::{AppError, Result};
use crate::middleware::SessionIdentity;
use crate::models::{CartLine, CartLineDetail};
use crate::routes::products::{LinkResponse, ProductView};
use crate::services::{CartService, checkout};
use crate::state::AppState;
use crate::store::StoreError;

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub selected_size: String,
    pub selected_color: String,
    pub product: Option<ProductView>,
    /// Discounted subtotal for this line.
    pub line_total: Decimal,
}

impl From<CartLineDetail> for CartLineView {
    fn from(detail: CartLineDetail) -> Self {
        let line_total = detail.subtotal();
        Self {
            id: detail.line.id.clone(),
            product_id: detail.line.product_id.clone(),
            quantity: detail.line.quantity,
            selected_size: detail.line.size().to_owned(),
            selected_color: detail.line.color().to_owned(),
            product: detail.product.map(ProductView::from),
            line_total,
        }
    }
}

/// Full cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub count: i64,
    /// Discounted grand total (one rounding over the undiscounted sum).
    pub total: Decimal,
    pub total_display: String,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
}

const fn default_quantity() -> i64 {
    1
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i64,
}

/// Response to a cart mutation: the affected line (when one remains) plus
/// the updated count.
#[derive(Debug, Serialize)]
pub struct CartMutationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<CartLine>,
    pub count: i64,
}

/// The current cart, hydrated with products and discounted totals.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.store());
    let details = cart.items_with_products(&session).await?;

    let count = details.iter().map(|d| d.line.quantity).sum();
    let total = checkout::checkout_total(&details);

    Ok(Json(CartView {
        items: details.into_iter().map(CartLineView::from).collect(),
        count,
        total,
        total_display: format_ksh(total),
    }))
}

/// Add a product variant to the cart, merging with an existing line.
#[instrument(skip(state, session, body))]
pub async fn add(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartMutationResponse>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let cart = CartService::new(state.store());
    let line = cart
        .add(
            &session,
            &ProductId::new(body.product_id),
            body.quantity,
            body.selected_size.as_deref(),
            body.selected_color.as_deref(),
        )
        .await?;
    let count = cart.count(&session).await?;

    Ok(Json(CartMutationResponse {
        item: Some(line),
        count,
    }))
}

/// Update a line's quantity. A quantity below one removes the line instead.
#[instrument(skip(state, session, body))]
pub async fn update(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
    Path(id): Path<String>,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartMutationResponse>> {
    let cart = CartService::new(state.store());
    let id = CartItemId::new(id);

    if body.quantity < 1 {
        cart.remove(&id).await?;
        let count = cart.count(&session).await?;
        return Ok(Json(CartMutationResponse { item: None, count }));
    }

    let line = cart
        .update_quantity(&id, body.quantity)
        .await
        .map_err(|e| match e {
            StoreError::RowNotFound => AppError::NotFound(format!("cart item {id}")),
            other => AppError::Store(other),
        })?;
    let count = cart.count(&session).await?;

    Ok(Json(CartMutationResponse {
        item: Some(line),
        count,
    }))
}

/// Remove a line. Idempotent: removing an unknown id succeeds.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
    Path(id): Path<String>,
) -> Result<Json<CartMutationResponse>> {
    let cart = CartService::new(state.store());
    cart.remove(&CartItemId::new(id)).await?;
    let count = cart.count(&session).await?;
    Ok(Json(CartMutationResponse { item: None, count }))
}

/// Clear every line for the session.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
) -> Result<Json<CartMutationResponse>> {
    let cart = CartService::new(state.store());
    cart.clear(&session).await?;
    Ok(Json(CartMutationResponse {
        item: None,
        count: 0,
    }))
}

/// Current badge count. Kept for first paint; mutations carry their own.
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
) -> Result<Json<CartMutationResponse>> {
    let cart = CartService::new(state.store());
    let count = cart.count(&session).await?;
    Ok(Json(CartMutationResponse { item: None, count }))
}

/// WhatsApp checkout link for the whole cart.
#[instrument(skip(state, session))]
pub async fn checkout_link(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
) -> Result<Json<LinkResponse>> {
    let cart = CartService::new(state.store());
    let details = cart.items_with_products(&session).await?;
    if details.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let url = checkout::cart_checkout_link(&state.config().whatsapp_phone, &details);
    Ok(Json(LinkResponse { url }))
}
