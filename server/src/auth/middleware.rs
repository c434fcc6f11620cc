use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "jwt";

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (UUIDv7)
    pub sub: String,
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Identity attached to requests that carried a valid session cookie.
/// Implements axum's FromRequestParts for use as an extractor on the
/// endpoints that require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

/// Build the session cookie for a freshly-issued token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}

/// Auth-context middleware: read the session cookie, verify it, and attach
/// AuthUser to the request extensions for downstream handlers.
///
/// A bad token is not a rejection. The cookie is removed on the response and
/// the request proceeds unauthenticated, so browsing degrades to anonymous.
pub async fn auth_context(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let mut clear_cookie = false;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match crate::auth::jwt::verify_session_token(&state.jwt_secret, cookie.value()) {
            Ok(claims) => {
                req.extensions_mut().insert(AuthUser {
                    id: claims.sub,
                    username: claims.username,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "Invalid session cookie, clearing");
                clear_cookie = true;
            }
        }
    }

    let response = next.run(req).await;

    if clear_cookie {
        let mut removal = Cookie::from(SESSION_COOKIE);
        removal.set_path("/");
        (jar.remove(removal), response).into_response()
    } else {
        response
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

// Option<AuthUser> never rejects: anonymous requests just yield None.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
