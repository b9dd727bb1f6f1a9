//! Session cookie plumbing and the session introspection endpoint.

use axum::{
    Json,
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, COOKIE, InvalidHeaderValue},
    },
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    api::{guard, state::SessionConfig},
    token::{SessionClaims, TokenCodec},
};

pub(crate) const SESSION_COOKIE_NAME: &str = "pordisto_session";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub subject: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<SessionClaims> for SessionResponse {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, codec: Extension<Arc<TokenCodec>>) -> impl IntoResponse {
    // A missing, stale, or forged token is all the same "no session" here;
    // nothing about why verification failed leaks out.
    match guard::verified_claims(&headers, &codec) {
        Some(claims) => (StatusCode::OK, Json(SessionResponse::from(claims))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Build the `HttpOnly` cookie carrying a freshly minted session token.
pub(crate) fn session_cookie(
    config: &SessionConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Cookie that expires the session immediately.
pub(crate) fn clear_session_cookie(
    config: &SessionConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let value = headers.get(COOKIE)?.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        // Flag-style cookies carry no value; skip them instead of bailing.
        let Some(val) = parts.next() else { continue };
        if key == SESSION_COOKIE_NAME {
            return Some(val.trim().to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
