//! Per-request session context
//!
//! Axum extractors that turn the session cookie into an explicit value
//! handed to each handler, and the guard that protects authenticated routes.

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use log::{info, warn};
use std::convert::Infallible;

use super::state::{Identity, SessionIdentity, SessionToken};
use crate::server::routes::LOGIN_PATH;
use crate::server::state::AppState;

/// The caller's session token, if the request carried one.
///
/// The token may be stale; the registry decides whether it is live.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        Self {
            token: read_cookie(headers, cookie_name).map(SessionToken::new),
        }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, &state.config.cookie_name))
    }
}

/// An authenticated caller.
///
/// Extracting this from an anonymous request rejects it with a redirect to
/// the login page, after remembering the requested path on the caller's
/// session so login can send them back.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub identity: SessionIdentity,
    pub token: SessionToken,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let context = SessionContext::from_headers(&parts.headers, &state.config.cookie_name);

        if let Some(token) = context.token() {
            if let Identity::Authenticated(identity) = state.sessions.resolve(token) {
                return Ok(CurrentUser {
                    identity,
                    token: token.clone(),
                });
            }
        }

        let token = state.sessions.ensure(context.token());
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        state.sessions.remember_return_to(&token, path);
        info!("Anonymous request for {} redirected to login", path);

        Err(with_session_cookie(
            Redirect::to(LOGIN_PATH),
            &token,
            state,
        ))
    }
}

/// Attaches the session cookie for `token` to a response.
pub fn with_session_cookie(
    response: impl IntoResponse,
    token: &SessionToken,
    state: &AppState,
) -> Response {
    let mut response = response.into_response();
    let cookie = session_cookie(
        &state.config.cookie_name,
        token,
        state.sessions.ttl().as_secs(),
    );

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!("Failed to encode session cookie: {}", e),
    }
    response
}

pub fn session_cookie(name: &str, token: &SessionToken, max_age_secs: u64) -> String {
    format!(
        "{name}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}",
        token.as_str()
    )
}

/// Value of cookie `name`, searching every `Cookie` header.
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn test_reads_named_cookie() {
        let headers = headers(&["theme=dark; gatehouse.sid=abc123; lang=en"]);
        let context = SessionContext::from_headers(&headers, "gatehouse.sid");
        assert_eq!(context.token().map(SessionToken::as_str), Some("abc123"));
    }

    #[test]
    fn test_reads_across_cookie_headers() {
        let headers = headers(&["theme=dark", "gatehouse.sid=xyz"]);
        assert_eq!(
            read_cookie(&headers, "gatehouse.sid").as_deref(),
            Some("xyz")
        );
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert!(read_cookie(&headers(&[]), "gatehouse.sid").is_none());
        assert!(read_cookie(&headers(&["gatehouse.sid="]), "gatehouse.sid").is_none());
        assert!(read_cookie(&headers(&["other.sid=abc"]), "gatehouse.sid").is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("gatehouse.sid", &SessionToken::new("tok"), 3600);
        assert_eq!(
            cookie,
            "gatehouse.sid=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );
    }
}
