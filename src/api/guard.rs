//! Session guard for protected routes.

use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::handlers::session::extract_session_token;
use crate::token::{SessionClaims, TokenCodec};

/// Gate a route on a fully verified session.
///
/// Possession of a cookie proves nothing; the token inside it has to pass
/// signature and expiry checks before the request continues. Verified
/// claims are handed to the inner handler through request extensions, and
/// everything else is sent to the login page.
pub async fn require_session(
    codec: Extension<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Response {
    match verified_claims(request.headers(), &codec) {
        Some(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        None => {
            debug!("No verified session, redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

/// Run full token verification against whatever the request carries.
pub(crate) fn verified_claims(headers: &HeaderMap, codec: &TokenCodec) -> Option<SessionClaims> {
    let token = extract_session_token(headers)?;
    codec.verify(&token).ok()
}
