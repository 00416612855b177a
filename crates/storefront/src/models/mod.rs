//! Typed views of remote-store rows.
//!
//! # Tables
//!
//! - `products` - catalog, read-only from the storefront's point of view
//! - `cart_items` - session-scoped cart lines
//! - `wishlist_items` - session-scoped wishlist entries
//!
//! Rows travel as JSON through the [`crate::store`] layer and deserialize
//! into these structs at the service boundary.

pub mod cart;
pub mod product;
pub mod wishlist;

pub use cart::{CartLine, CartLineDetail};
pub use product::Product;
pub use wishlist::WishlistEntry;
