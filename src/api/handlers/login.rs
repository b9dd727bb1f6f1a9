//! Login: exchange the admin password for a session cookie.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::{ErrorResponse, session::session_cookie};
use crate::{
    api::{guard, state::SessionConfig},
    auth::SharedCredentials,
    token::TokenCodec,
};

/// Subject claim carried by every session this service mints.
pub const SESSION_SUBJECT: &str = "admin";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub ok: bool,
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Failed to establish a session", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    codec: Extension<Arc<TokenCodec>>,
    credentials: Extension<SharedCredentials>,
    config: Extension<SessionConfig>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    if !credentials.verify_password(&request.password) {
        // One generic answer for every failure mode.
        warn!("Rejected login attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::unauthorized()),
        )
            .into_response();
    }

    let token = match codec.mint(SESSION_SUBJECT) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to mint session token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(&config, &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response();
        }
    }

    info!("Session established for {SESSION_SUBJECT}");
    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse { ok: true }),
    )
        .into_response()
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginPage {
    pub message: String,
    pub login: String,
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "How to authenticate", body = LoginPage),
        (status = 303, description = "Already authenticated, sent to the dashboard")
    ),
    tag = "auth"
)]
pub async fn login_page(headers: HeaderMap, codec: Extension<Arc<TokenCodec>>) -> impl IntoResponse {
    // Only a fully verified token skips the prompt; a cookie being present
    // means nothing on its own.
    if guard::verified_claims(&headers, &codec).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let page = LoginPage {
        message: "authentication required".to_string(),
        login: "POST /v1/auth/login".to_string(),
    };
    (StatusCode::OK, Json(page)).into_response()
}
