//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Products
//! GET  /api/products                    - Product listing (category, q, featured, limit)
//! GET  /api/products/{id}               - Product detail
//! GET  /api/products/{id}/order-link    - WhatsApp order link for one product
//!
//! # Cart
//! GET    /api/cart                      - Hydrated cart with discounted totals
//! POST   /api/cart/items                - Add to cart (merges duplicate variants)
//! PATCH  /api/cart/items/{id}           - Update quantity (< 1 removes)
//! DELETE /api/cart/items/{id}           - Remove line
//! DELETE /api/cart                      - Clear cart
//! GET    /api/cart/count                - Cart count badge value
//! GET    /api/cart/checkout-link        - WhatsApp checkout link
//!
//! # Wishlist
//! GET    /api/wishlist                  - Wishlist entries
//! GET    /api/wishlist/{product_id}     - Membership check
//! PUT    /api/wishlist/{product_id}     - Add (idempotent)
//! DELETE /api/wishlist/{product_id}     - Remove
//! ```
//!
//! Every cart mutation response carries the updated `count`, so clients keep
//! their badge current without polling; `GET /api/cart/count` remains for the
//! initial render.

pub mod cart;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id_middleware, session_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/order-link", get(products::order_link))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove).patch(cart::update))
        .route("/count", get(cart::count))
        .route("/checkout-link", get(cart::checkout_link))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new().route("/", get(wishlist::index)).route(
        "/{product_id}",
        get(wishlist::status)
            .put(wishlist::add)
            .delete(wishlist::remove),
    )
}

/// Assemble the full application router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(from_fn(session_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}
