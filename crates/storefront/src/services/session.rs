//! Session identity provider.
//!
//! Derives and persists the opaque per-client token that scopes all cart and
//! wishlist rows. The token lives under the fixed key `user_session_id` in
//! whatever durable storage the embedding provides: an HTTP cookie for the
//! web API (see [`crate::middleware::session`]), a file for the CLI, an
//! in-memory cell for tests.
//!
//! There is no expiry and no rotation; a token is generated at most once per
//! storage scope and reused for every subsequent request. When storage is
//! unavailable the error propagates and cart/wishlist simply become unusable,
//! which is acceptable degradation for an anonymous storefront.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use savanna_core::SessionToken;

/// The fixed storage key for the session token.
pub const SESSION_STORAGE_KEY: &str = "user_session_id";

/// Length of the random base-36 suffix.
const TOKEN_SUFFIX_LEN: usize = 9;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Errors from the session identity provider.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The durable token storage could not be read or written.
    #[error("session storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Durable key-value storage for the one session token.
pub trait SessionStore {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StorageUnavailable`] when storage cannot be
    /// read.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist the token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StorageUnavailable`] when storage cannot be
    /// written.
    fn save(&mut self, token: &str) -> Result<(), SessionError>;
}

/// Generate a fresh session token: `session_{unix_millis}_{base36 suffix}`.
///
/// Collision probability is negligible at single-storefront scale; the
/// timestamp prefix alone separates all but same-millisecond generations.
#[must_use]
pub fn generate_token() -> SessionToken {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..TOKEN_SUFFIX_LEN)
        .map(|_| {
            let index = rng.random_range(0..BASE36_ALPHABET.len());
            char::from(BASE36_ALPHABET[index])
        })
        .collect();
    SessionToken::new(format!("session_{millis}_{suffix}"))
}

/// Return the stored session token, generating and persisting one on first
/// use.
///
/// Idempotent after the first call: every later call in the same storage
/// scope returns the same token.
///
/// # Errors
///
/// Propagates [`SessionError::StorageUnavailable`] from the store.
pub fn resolve_session<S: SessionStore>(store: &mut S) -> Result<SessionToken, SessionError> {
    if let Some(existing) = store.load()? {
        return Ok(SessionToken::new(existing));
    }
    let token = generate_token();
    store.save(token.as_str())?;
    Ok(token)
}

/// File-backed [`SessionStore`] for non-browser embeddings (the CLI).
///
/// Stores the bare token string in a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Use `path` as the token file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Remove the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StorageUnavailable`] when the file exists but
    /// cannot be removed.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::StorageUnavailable(e.to_string())),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_owned()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::StorageUnavailable(e.to_string())),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SessionError::StorageUnavailable(e.to_string()))?;
        }
        fs::write(&self.path, token)
            .map_err(|e| SessionError::StorageUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simple in-memory store for exercising `resolve_session`.
    #[derive(Default)]
    struct MemorySessionStore {
        value: Option<String>,
        fail: bool,
    }

    impl SessionStore for MemorySessionStore {
        fn load(&self) -> Result<Option<String>, SessionError> {
            if self.fail {
                return Err(SessionError::StorageUnavailable("disabled".to_owned()));
            }
            Ok(self.value.clone())
        }

        fn save(&mut self, token: &str) -> Result<(), SessionError> {
            if self.fail {
                return Err(SessionError::StorageUnavailable("disabled".to_owned()));
            }
            self.value = Some(token.to_owned());
            Ok(())
        }
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        let token = token.as_str();
        assert!(token.starts_with("session_"));

        let parts: Vec<&str> = token.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), TOKEN_SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_resolve_session_is_stable() {
        let mut store = MemorySessionStore::default();
        let first = resolve_session(&mut store).expect("first resolve");
        let second = resolve_session(&mut store).expect("second resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_session_storage_unavailable() {
        let mut store = MemorySessionStore {
            value: None,
            fail: true,
        };
        let err = resolve_session(&mut store).unwrap_err();
        assert!(matches!(err, SessionError::StorageUnavailable(_)));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "savanna-session-{}.txt",
            uuid::Uuid::new_v4()
        ));
        let mut store = FileSessionStore::new(&path);

        assert!(store.load().expect("empty load").is_none());

        let first = resolve_session(&mut store).expect("first resolve");
        let second = resolve_session(&mut store).expect("second resolve");
        assert_eq!(first, second);

        store.clear().expect("clear");
        assert!(store.load().expect("cleared load").is_none());
        store.clear().expect("clearing twice is fine");
    }
}
