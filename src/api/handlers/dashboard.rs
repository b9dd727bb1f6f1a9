//! The protected dashboard payload.

use axum::{Json, extract::Extension, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::session::SessionResponse;
use crate::{GIT_COMMIT_HASH, token::SessionClaims};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Dashboard {
    name: String,
    version: String,
    commit: String,
    session: SessionResponse,
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard for the authenticated admin", body = Dashboard),
        (status = 303, description = "No verified session, sent to the login page")
    ),
    tag = "dashboard"
)]
// The guard middleware inserts the claims; this handler never runs without them.
pub async fn dashboard(claims: Extension<SessionClaims>) -> impl IntoResponse {
    let dashboard = Dashboard {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: GIT_COMMIT_HASH.to_string(),
        session: SessionResponse::from(claims.0),
    };
    Json(dashboard)
}
