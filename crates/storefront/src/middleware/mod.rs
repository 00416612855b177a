//! HTTP middleware for the storefront.

pub mod request_id;
pub mod session;

pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, SessionIdentity, session_middleware};
