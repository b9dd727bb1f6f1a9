use crate::{
    api::handlers::{dashboard, health, login, logout, session},
    auth::SharedCredentials,
    token::TokenCodec,
};
use anyhow::Result;
use axum::{
    Extension, Json, Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware,
    response::Redirect,
    routing::{get, options, post},
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, debug_span, error, info};
use ulid::Ulid;

mod guard;
pub(crate) mod handlers;
mod openapi;
pub mod state;

pub use openapi::openapi;
pub use state::SessionConfig;

#[cfg(test)]
mod tests;

/// Build the application router.
///
/// Everything under the guard goes through full token verification; the
/// rest answers without a session. Extensions are layered outermost so
/// both the guard and the handlers can extract them.
#[must_use]
pub fn router(
    codec: Arc<TokenCodec>,
    credentials: SharedCredentials,
    config: SessionConfig,
) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route_layer(middleware::from_fn(guard::require_session));

    let cors = CorsLayer::new()
        // allow `GET` and `POST` when accessing the resource
        .allow_methods([Method::GET, Method::POST])
        // allow requests from any origin
        .allow_origin(Any);

    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/login", get(login::login_page))
        .route("/health", get(health::health))
        .route("/health", options(health::health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::openapi()) }),
        )
        .route("/v1/auth/login", post(login::login))
        .route("/v1/auth/logout", post(logout::logout))
        .route("/v1/auth/session", get(session::session))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(codec))
                .layer(Extension(credentials))
                .layer(Extension(config)),
        )
}

/// Serve the API until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn new(
    port: u16,
    codec: Arc<TokenCodec>,
    credentials: SharedCredentials,
    config: SessionConfig,
) -> Result<()> {
    // Signal watcher feeds the graceful shutdown channel.
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_shutdown_watcher(tx);

    let app = router(codec, credentials, config);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            rx.recv().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// SIGINT from a terminal, SIGTERM from a supervisor.
fn spawn_shutdown_watcher(tx: mpsc::UnboundedSender<()>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(err) => {
                    error!("Failed to install SIGTERM handler: {err}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => info!("Received SIGINT"),
            () = terminate => info!("Received SIGTERM"),
        }

        let _ = tx.send(());
    });
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
