// Engine-level resolution properties: caching, TTL expiry, suffix-walk
// bounds, and destination validation, all observed through the mock DoH
// server's query counter.

mod helpers;

use std::time::Duration;

use helpers::{build_state, spawn_mock_doh};

const HOUR: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn record_on_parent_domain_covers_subdomain() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    let state = build_state(&endpoint, HOUR);

    let destination = state.resolver.resolve("a.example.com").await;
    assert_eq!(destination, Some("target.com".to_string()));
    // One miss at the full hostname, one hit at the parent
    assert_eq!(mock.query_count(), 2);

    // Cached under the matching domain and under the original hostname
    assert_eq!(
        state.cache.lookup("example.com"),
        Some("target.com".to_string())
    );
    assert_eq!(
        state.cache.lookup("a.example.com"),
        Some("target.com".to_string())
    );
}

#[tokio::test]
async fn repeat_resolution_is_a_pure_cache_hit() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    let state = build_state(&endpoint, HOUR);

    let first = state.resolver.resolve("a.example.com").await;
    let queries_after_first = mock.query_count();

    let second = state.resolver.resolve("a.example.com").await;
    assert_eq!(first, second);
    // No further network traffic within the TTL
    assert_eq!(mock.query_count(), queries_after_first);
}

#[tokio::test]
async fn sibling_subdomain_reuses_parent_entry() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    let state = build_state(&endpoint, HOUR);

    assert_eq!(
        state.resolver.resolve("a.example.com").await,
        Some("target.com".to_string())
    );
    assert_eq!(mock.query_count(), 2);

    // The sibling pays one lookup at its own level, then hits the
    // parent's cache entry instead of querying again
    assert_eq!(
        state.resolver.resolve("b.example.com").await,
        Some("target.com".to_string())
    );
    assert_eq!(mock.query_count(), 3);
}

#[tokio::test]
async fn stale_entry_is_requeried_after_ttl() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    let state = build_state(&endpoint, Duration::from_millis(50));

    assert_eq!(
        state.resolver.resolve("example.com").await,
        Some("target.com".to_string())
    );
    assert_eq!(mock.query_count(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        state.resolver.resolve("example.com").await,
        Some("target.com".to_string())
    );
    assert_eq!(mock.query_count(), 2);
}

#[tokio::test]
async fn suffix_walk_is_bounded_at_five_lookups() {
    let (mock, endpoint) = spawn_mock_doh().await;
    let state = build_state(&endpoint, HOUR);

    let hostname = "a.b.c.d.e.f.g.h.i.example.com";
    assert_eq!(state.resolver.resolve(hostname).await, None);
    assert_eq!(mock.query_count(), 5);
}

#[tokio::test]
async fn suffix_walk_stops_below_two_labels() {
    let (mock, endpoint) = spawn_mock_doh().await;
    let state = build_state(&endpoint, HOUR);

    // a.b.c, then b.c; the bare label "c" is never queried
    assert_eq!(state.resolver.resolve("a.b.c").await, None);
    assert_eq!(mock.query_count(), 2);
}

#[tokio::test]
async fn no_negative_caching() {
    let (mock, endpoint) = spawn_mock_doh().await;
    let state = build_state(&endpoint, HOUR);

    assert_eq!(state.resolver.resolve("unknown.com").await, None);
    assert_eq!(mock.query_count(), 1);

    // A failed walk is re-queried on the next request
    assert_eq!(state.resolver.resolve("unknown.com").await, None);
    assert_eq!(mock.query_count(), 2);
}

#[tokio::test]
async fn invalid_destinations_are_rejected_and_walk_continues() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt(
        "_redirect.a.example.com",
        &["destination=*.evil.com", "destination=1.2.3.4"],
    );
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    let state = build_state(&endpoint, HOUR);

    assert_eq!(
        state.resolver.resolve("a.example.com").await,
        Some("target.com".to_string())
    );
    assert_eq!(mock.query_count(), 2);
    // The rejected candidates were never cached
    assert_eq!(state.cache.lookup("a.example.com"), Some("target.com".to_string()));
}

#[tokio::test]
async fn non_destination_records_are_ignored() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt("_redirect.a.example.com", &["v=spf1 -all", "unrelated"]);
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    let state = build_state(&endpoint, HOUR);

    assert_eq!(
        state.resolver.resolve("a.example.com").await,
        Some("target.com".to_string())
    );
}

#[tokio::test]
async fn slow_provider_fails_closed() {
    let (mock, endpoint) = spawn_mock_doh().await;
    mock.insert_txt("_redirect.example.com", &["destination=target.com"]);
    // Longer than the 500ms test DNS timeout
    mock.set_delay(Duration::from_millis(900));
    let state = build_state(&endpoint, HOUR);

    // Timeouts degrade to "no destination found"; nothing is cached
    assert_eq!(state.resolver.resolve("example.com").await, None);
    assert!(state.cache.is_empty());
}
