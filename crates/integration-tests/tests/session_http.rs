//! Session cookie behaviour through the HTTP middleware.
//!
//! Exercises the middleware with a minimal router: a handler that echoes the
//! resolved token, so the tests can compare what the handler saw with what
//! the cookie carries.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn,
    routing::get,
};
use tower::ServiceExt;

use savanna_storefront::middleware::{SESSION_COOKIE_NAME, SessionIdentity, session_middleware};

fn test_router() -> Router {
    async fn echo(SessionIdentity(token): SessionIdentity) -> String {
        token.as_str().to_owned()
    }

    Router::new()
        .route("/whoami", get(echo))
        .layer(from_fn(session_middleware))
}

async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn first_request_mints_a_cookie() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie present")
        .to_str()
        .expect("cookie is ascii")
        .to_owned();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=session_")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    // The token the handler saw is the one the cookie persists.
    let cookie_token = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_owned())
        .expect("cookie value");
    let seen = body_string(response.into_body()).await;
    assert_eq!(seen, cookie_token);
}

#[tokio::test]
async fn returning_client_keeps_its_token() {
    let token = "session_1700000000000_abc123xyz";
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={token}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    // No re-issue for a request that already carries the cookie.
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let seen = body_string(response.into_body()).await;
    assert_eq!(seen, token);
}
