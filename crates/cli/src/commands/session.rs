//! Manage the CLI's persisted session token.
//!
//! The CLI keeps its token in a plain file, the counterpart of the browser
//! cookie: `$SAVANNA_SESSION_FILE` when set, otherwise
//! `$HOME/.savanna/session`.

use std::path::PathBuf;

use tracing::info;

use savanna_storefront::services::session::{FileSessionStore, resolve_session};

/// Environment variable overriding the token file location.
const SESSION_FILE_VAR: &str = "SAVANNA_SESSION_FILE";

/// Resolve the token file location.
fn session_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var(SESSION_FILE_VAR) {
        return Ok(PathBuf::from(path));
    }
    let home = std::env::var("HOME").map_err(|_| "HOME not set; set SAVANNA_SESSION_FILE")?;
    Ok(PathBuf::from(home).join(".savanna").join("session"))
}

/// Print the persisted session token, generating and saving one if missing.
///
/// # Errors
///
/// Returns an error when the token file cannot be read or written.
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileSessionStore::new(session_file()?);
    let token = resolve_session(&mut store)?;
    info!(path = %store.path().display(), "Session token: {}", token.as_str());
    Ok(())
}

/// Delete the persisted session token. A later `show` mints a fresh one.
///
/// # Errors
///
/// Returns an error when the token file exists but cannot be removed.
pub fn reset() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileSessionStore::new(session_file()?);
    store.clear()?;
    info!(path = %store.path().display(), "Session token cleared");
    Ok(())
}
