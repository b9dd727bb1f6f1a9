//! In-process tests covering login, the session gate, and secret rotation.

use super::{SessionConfig, router};
use crate::{
    auth::CredentialStore,
    secrets::{EnvFileStore, SharedSecrets, rotation, testing::FixedSecrets},
    token::TokenCodec,
};
use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, Response, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

const PASSWORD: &str = "opensesame";
const TTL: i64 = 600;

// Plain comparison keeps these tests off the Argon2 hot path; the real
// store is covered by its own tests and the end-to-end suite.
struct PlainPassword(&'static str);

impl CredentialStore for PlainPassword {
    fn verify_password(&self, candidate: &str) -> bool {
        candidate == self.0
    }
}

fn app() -> Router {
    app_with_source(Arc::new(FixedSecrets::new(Some("router-secret"), None)))
}

fn app_with_source(source: SharedSecrets) -> Router {
    let codec = Arc::new(TokenCodec::new(source, TTL));
    router(
        codec,
        Arc::new(PlainPassword(PASSWORD)),
        SessionConfig::new().with_session_ttl_seconds(TTL),
    )
}

async fn login(app: &Router, password: &str) -> Result<Response<Body>> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/login")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "password": password }).to_string()))?,
        )
        .await?;
    Ok(response)
}

async fn get_with_cookie(
    app: &Router,
    uri: &str,
    token: Option<&str>,
) -> Result<Response<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(COOKIE, format!("pordisto_session={token}"));
    }
    let response = app.clone().oneshot(builder.body(Body::empty())?).await?;
    Ok(response)
}

fn cookie_token(response: &Response<Body>) -> Option<String> {
    let value = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let rest = value.strip_prefix("pordisto_session=")?;
    rest.split(';').next().map(ToString::to_string)
}

async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn login_sets_a_hardened_session_cookie() -> Result<()> {
    let app = app();
    let response = login(&app, PASSWORD).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .expect("set-cookie header");
    assert!(cookie.starts_with("pordisto_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=600"));
    assert!(!cookie.ends_with("; Secure"));

    let body = body_json(response).await?;
    assert_eq!(body, json!({ "ok": true }));
    Ok(())
}

#[tokio::test]
async fn wrong_password_gets_the_generic_401() -> Result<()> {
    let app = app();
    let response = login(&app, "not-the-password").await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());

    let body = body_json(response).await?;
    assert_eq!(body, json!({ "error": "unauthorized" }));
    Ok(())
}

#[tokio::test]
async fn dashboard_without_a_session_redirects_to_login() -> Result<()> {
    let app = app();
    let response = get_with_cookie(&app, "/dashboard", None).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/login")
    );
    Ok(())
}

#[tokio::test]
async fn cookie_presence_alone_does_not_unlock_the_dashboard() -> Result<()> {
    let app = app();
    // An unverifiable token gets the same answer as no cookie at all.
    let response = get_with_cookie(&app, "/dashboard", Some("garbage")).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/login")
    );
    Ok(())
}

#[tokio::test]
async fn cookie_from_login_unlocks_the_dashboard() -> Result<()> {
    let app = app();
    let response = login(&app, PASSWORD).await?;
    let token = cookie_token(&response).expect("cookie token");

    let response = get_with_cookie(&app, "/dashboard", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["session"]["subject"], "admin");
    Ok(())
}

#[tokio::test]
async fn bearer_token_also_unlocks_the_dashboard() -> Result<()> {
    let app = app();
    let response = login(&app, PASSWORD).await?;
    let token = cookie_token(&response).expect("cookie token");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/dashboard")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn session_endpoint_reports_the_active_session() -> Result<()> {
    let app = app();
    let response = login(&app, PASSWORD).await?;
    let token = cookie_token(&response).expect("cookie token");

    let response = get_with_cookie(&app, "/v1/auth/session", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["subject"], "admin");
    let issued_at = body["issued_at"].as_i64().expect("issued_at");
    let expires_at = body["expires_at"].as_i64().expect("expires_at");
    assert_eq!(expires_at - issued_at, TTL);

    let response = get_with_cookie(&app, "/v1/auth/session", None).await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_cookie_even_without_a_session() -> Result<()> {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/logout")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("set-cookie header");
    assert!(cookie.starts_with("pordisto_session=;"));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn root_redirects_to_the_dashboard() -> Result<()> {
    let app = app();
    let response = get_with_cookie(&app, "/", None).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/dashboard")
    );
    Ok(())
}

#[tokio::test]
async fn health_answers_with_build_metadata() -> Result<()> {
    let app = app();
    let response = get_with_cookie(&app, "/health", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));

    let body = body_json(response).await?;
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn options_health_has_no_body() -> Result<()> {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/health")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(bytes.is_empty());
    Ok(())
}

#[tokio::test]
async fn login_page_prompts_or_redirects() -> Result<()> {
    let app = app();
    let response = get_with_cookie(&app, "/login", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["login"], "POST /v1/auth/login");

    let response = login(&app, PASSWORD).await?;
    let token = cookie_token(&response).expect("cookie token");
    let response = get_with_cookie(&app, "/login", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/dashboard")
    );
    Ok(())
}

#[tokio::test]
async fn api_docs_serve_the_document() -> Result<()> {
    let app = app();
    let response = get_with_cookie(&app, "/api-docs/openapi.json", None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/dashboard"].is_object());
    Ok(())
}

#[tokio::test]
async fn secret_rotation_keeps_then_drops_live_sessions() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join(".env.local");
    std::fs::write(&path, "JWT_SECRET=AAA\n")?;

    let app = app_with_source(Arc::new(EnvFileStore::new(&path)));

    let response = login(&app, PASSWORD).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let token = cookie_token(&response).expect("cookie token");

    // First rotation demotes AAA to previous; the running app sees the
    // rewrite on the next request, no restart involved.
    rotation::rotate_file(&path)?;
    let response = get_with_cookie(&app, "/dashboard", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Second rotation drops AAA entirely; the session is gone.
    rotation::rotate_file(&path)?;
    let response = get_with_cookie(&app, "/dashboard", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    Ok(())
}
