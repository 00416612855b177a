//! Anonymous session identity middleware.
//!
//! The web face of the session identity provider: the per-client token lives
//! in a long-lived cookie named after the fixed `user_session_id` storage
//! key. The middleware reads it on the way in (minting a fresh token when
//! absent), exposes it to handlers via request extensions, and sets the
//! cookie on the way out for newly minted tokens.
//!
//! Handlers receive the token through the [`SessionIdentity`] extractor and
//! pass it explicitly into the collection services - the services themselves
//! never touch ambient storage.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, StatusCode, header, request::Parts},
    middleware::Next,
    response::Response,
};

use savanna_core::SessionToken;

use crate::services::session::{SESSION_STORAGE_KEY, generate_token};

/// Cookie name carrying the session token.
pub const SESSION_COOKIE_NAME: &str = SESSION_STORAGE_KEY;

/// Cookie lifetime: one year. No rotation; carts persist until cleared.
const SESSION_COOKIE_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

/// The resolved session token for the current request.
#[derive(Debug, Clone)]
pub struct SessionIdentity(pub SessionToken);

impl<S> FromRequestParts<S> for SessionIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "session middleware not installed",
        ))
    }
}

/// Middleware that resolves the session token for every request.
///
/// A request without a `user_session_id` cookie gets a freshly generated
/// token and a `Set-Cookie` on the response; a request with one reuses it
/// unchanged, so the token is stable for the lifetime of the cookie.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let existing = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_session_cookie);

    let (token, minted) = existing.map_or_else(
        || (generate_token(), true),
        |value| (SessionToken::new(value), false),
    );

    request
        .extensions_mut()
        .insert(SessionIdentity(token.clone()));

    let mut response = next.run(request).await;

    if minted {
        let cookie = format!(
            "{SESSION_COOKIE_NAME}={}; Path=/; Max-Age={SESSION_COOKIE_MAX_AGE_SECONDS}; SameSite=Lax; HttpOnly",
            token.as_str()
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Pull the session token out of a `Cookie` header value.
fn extract_session_cookie(header: &str) -> Option<String> {
    header
        .split(';')
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE_NAME).then(|| value.to_owned())
        })
        .filter(|value| !value.is_empty())
}
