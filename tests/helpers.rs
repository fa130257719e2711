// Shared test helpers: a programmable mock dns-json server and service wiring.
//
// The mock server speaks the same `application/dns-json` contract as a real
// DoH provider: records are registered per fully qualified query name, every
// HTTP query is counted, and unknown names answer with DNS status 3
// (NXDOMAIN). An optional artificial delay simulates a slow provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use url::Url;

use dns_redirect::config::RESOLVE_DEADLINE;
use dns_redirect::{AppState, DestinationResolver, DnsCache, DohClient, ErrorStats};

/// Programmable dns-json backend shared with the spawned mock server.
#[derive(Clone, Default)]
pub struct MockDns {
    records: Arc<Mutex<HashMap<String, Vec<String>>>>,
    queries: Arc<AtomicUsize>,
    delay: Arc<Mutex<Option<Duration>>>,
}

#[allow(dead_code)] // Used by other test files
impl MockDns {
    /// Registers TXT values for a fully qualified query name,
    /// e.g. `_redirect.example.com`.
    pub fn insert_txt(&self, name: &str, values: &[&str]) {
        self.records
            .lock()
            .expect("mock records lock")
            .insert(name.to_string(), values.iter().map(|v| v.to_string()).collect());
    }

    /// Number of HTTP queries the mock has served.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Delays every answer by `delay`, to exercise timeout handling.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().expect("mock delay lock") = Some(delay);
    }
}

#[derive(Deserialize)]
struct DnsQuery {
    name: String,
}

async fn dns_query(
    State(mock): State<MockDns>,
    Query(q): Query<DnsQuery>,
) -> Json<serde_json::Value> {
    mock.queries.fetch_add(1, Ordering::SeqCst);

    let delay = *mock.delay.lock().expect("mock delay lock");
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let records = mock
        .records
        .lock()
        .expect("mock records lock")
        .get(&q.name)
        .cloned();

    let body = match records {
        Some(values) => {
            let answers: Vec<serde_json::Value> = values
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "name": q.name,
                        "type": 16,
                        "TTL": 300,
                        "data": format!("\"{v}\"")
                    })
                })
                .collect();
            serde_json::json!({ "Status": 0, "Answer": answers })
        }
        None => serde_json::json!({ "Status": 3 }),
    };
    Json(body)
}

/// Starts the mock DoH server on an ephemeral port.
///
/// Returns the programmable backend and the endpoint URL to hand to the
/// service under test.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_mock_doh() -> (MockDns, String) {
    let mock = MockDns::default();
    let app = Router::new()
        .route("/dns-query", get(dns_query))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock doh listener");
    let addr = listener.local_addr().expect("mock doh local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock doh server");
    });

    (mock, format!("http://{addr}/dns-query"))
}

/// Builds application state wired to a mock endpoint, with short timeouts
/// for fast test failures.
#[allow(dead_code)] // Used by other test files
pub fn build_state(endpoint: &str, cache_ttl: Duration) -> AppState {
    build_state_with_deadline(endpoint, cache_ttl, RESOLVE_DEADLINE)
}

/// Like [`build_state`], with an explicit per-request resolution deadline.
#[allow(dead_code)] // Used by other test files
pub fn build_state_with_deadline(
    endpoint: &str,
    cache_ttl: Duration,
    resolve_deadline: Duration,
) -> AppState {
    let error_stats = Arc::new(ErrorStats::new());
    let cache = Arc::new(DnsCache::with_ttl(cache_ttl));
    let dns_timeout = Duration::from_millis(500);
    let http = reqwest::Client::builder()
        .timeout(dns_timeout)
        .build()
        .expect("build http client");
    let doh = Arc::new(DohClient::new(
        http,
        Url::parse(endpoint).expect("valid mock endpoint"),
        dns_timeout,
        Arc::clone(&error_stats),
    ));
    let resolver = Arc::new(DestinationResolver::new(
        Arc::clone(&cache),
        doh,
        Arc::clone(&error_stats),
    ));
    AppState {
        cache,
        resolver,
        error_stats,
        resolve_deadline,
    }
}

/// Starts the real service router on an ephemeral port and returns its base URL.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_service(state: AppState) -> String {
    let app = dns_redirect::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind service listener");
    let addr = listener.local_addr().expect("service local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("service under test");
    });
    format!("http://{addr}")
}

/// HTTP client with redirect following disabled, so 307 responses can be
/// inspected directly.
#[allow(dead_code)] // Used by other test files
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build test client")
}
