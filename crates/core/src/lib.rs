//! Savanna Core - Shared types library.
//!
//! This crate provides common types used across all Savanna Threads components:
//! - `storefront` - Public-facing e-commerce API
//! - `cli` - Command-line tools for seeding and session management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, session tokens,
//!   categories, and the storewide discount math

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
