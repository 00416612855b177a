//! Business logic for the storefront.
//!
//! The collection services ([`CartService`], [`WishlistService`]) are pure
//! with respect to identity: every call takes the [`savanna_core::SessionToken`]
//! explicitly instead of reading ambient storage, which keeps them testable
//! without a storage double. Token persistence lives in [`session`] and is
//! wired up by the HTTP middleware or the CLI's file store.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod session;
pub mod wishlist;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use session::{FileSessionStore, SessionError, SessionStore};
pub use wishlist::WishlistService;
