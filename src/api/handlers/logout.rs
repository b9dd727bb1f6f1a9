//! Logout: expire the session cookie.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use tracing::error;

use super::session::clear_session_cookie;
use crate::api::state::SessionConfig;

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "auth"
)]
pub async fn logout(config: Extension<SessionConfig>) -> impl IntoResponse {
    // Tokens are stateless, so expiring the cookie is the whole revocation.
    // Always clear it, even when no session was presented.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(&config) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}
