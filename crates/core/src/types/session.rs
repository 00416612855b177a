//! Opaque per-client session tokens.
//!
//! A `SessionToken` scopes every cart and wishlist row to one anonymous
//! visitor. It is generated once per client profile, persisted under the
//! fixed `user_session_id` key in whatever durable storage the embedding
//! provides (cookie, file), and reused for all subsequent requests. The token
//! is never transmitted anywhere except as a filter key to the remote store.

use serde::{Deserialize, Serialize};

/// Opaque session identifier for an anonymous visitor.
///
/// The canonical shape is `session_{unix_millis}_{base36 suffix}`, but the
/// type makes no attempt to validate it: any previously persisted value is
/// honored as-is so existing carts survive format changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an existing token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the underlying token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}
