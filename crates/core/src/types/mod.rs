//! Core types for Savanna Threads.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod session;

pub use category::{Category, CategoryParseError};
pub use id::*;
pub use price::{cart_total, discounted, format_ksh, line_subtotal, DISCOUNT_PERCENT};
pub use session::SessionToken;
