//! HTTP hosting shell.
//!
//! A thin axum layer around the decision handler: requests whose path is on
//! the exclusion list (API routes, static assets, favicon) bypass the engine
//! entirely; everything else is run through [`decide_redirect`] and either
//! forwarded to the inner application, redirected, or answered with an error.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::cache::DnsCache;
use crate::error_handling::ErrorStats;
use crate::handler::{decide_redirect, RedirectDecision};
use crate::resolver::DestinationResolver;

/// Shared state for the edge service.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide destination cache.
    pub cache: Arc<DnsCache>,
    /// Resolution engine.
    pub resolver: Arc<DestinationResolver>,
    /// Fault counters, exposed on `/api/status`.
    pub error_stats: Arc<ErrorStats>,
    /// Overall per-request resolution deadline.
    pub resolve_deadline: Duration,
}

/// Paths never considered for redirection.
///
/// API routes and static assets belong to the hosting application itself;
/// intercepting them would make the service unreachable under its own name.
pub fn is_excluded_path(path: &str) -> bool {
    path == "/api"
        || path.starts_with("/api/")
        || path.starts_with("/static/")
        || path == "/favicon.ico"
}

/// Middleware that intercepts redirect candidates.
///
/// Pass-through decisions hand the request to the inner application via
/// `next`; redirect and error decisions are terminal.
pub async fn redirect_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if is_excluded_path(req.uri().path()) {
        return next.run(req).await;
    }

    // Edge deployments terminate TLS upstream; trust the forwarded scheme
    // when present, else fall back to the request URI.
    let scheme = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().scheme_str())
        .unwrap_or("http")
        .to_string();
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();

    let decision = decide_redirect(
        &state.resolver,
        &state.error_stats,
        &scheme,
        host.as_deref(),
        &path_and_query,
        state.resolve_deadline,
    )
    .await;

    match decision {
        RedirectDecision::PassThrough => next.run(req).await,
        RedirectDecision::Redirect {
            location,
            status,
            headers,
        } => redirect_response(&location, status, &headers),
        RedirectDecision::Error { status, body } => error_response(status, body),
    }
}

fn redirect_response(
    location: &str,
    status: u16,
    extra: &[(&'static str, &'static str)],
) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::TEMPORARY_REDIRECT);
    let mut response = status.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, value);
    }
    for (name, value) in extra {
        headers.insert(*name, HeaderValue::from_static(value));
    }
    response
}

fn error_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))],
        body,
    )
        .into_response()
}

/// JSON diagnostics: cache size and fault counters.
async fn status_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut errors = serde_json::Map::new();
    for (name, count) in state.error_stats.snapshot() {
        errors.insert(name.to_string(), serde_json::Value::from(count));
    }
    Json(serde_json::json!({
        "cache_entries": state.cache.len(),
        "errors": errors,
    }))
}

/// Inner application answered on pass-through.
async fn passthrough_handler() -> &'static str {
    "dns_redirect: no redirect applies to this request\n"
}

/// Builds the service router: the redirect middleware layered over the
/// status endpoint and a trivial inner application.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .fallback(passthrough_handler)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, redirect_middleware))
}

/// Binds the listener and serves until the process is stopped.
pub async fn serve(port: u16, state: AppState) -> Result<(), anyhow::Error> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind redirect service to port {}: {}", port, e))?;

    log::info!("Redirect service listening on http://0.0.0.0:{}/", port);
    log::info!("  - Status: http://127.0.0.1:{}/api/status", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Redirect service error: {}", e))?;

    Ok(())
}
