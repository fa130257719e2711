//! Configuration constants.
//!
//! This module defines all operational constants used throughout the service,
//! including the TXT record convention, cache and timeout parameters, and
//! hostname length limits.

use std::time::Duration;

/// DNS name prefix under which redirect TXT records are published.
///
/// A domain opts into redirection by creating a TXT record at
/// `_redirect.<domain>` whose value is `destination=<target-domain>`.
pub const TXT_PREFIX: &str = "_redirect.";

/// Prefix of the TXT record value that carries the redirect target.
pub const DESTINATION_PREFIX: &str = "destination=";

/// How long a resolved destination stays valid in the cache.
///
/// One hour balances DNS propagation latency against query volume: a domain
/// owner changing their record sees the change within an hour, while repeat
/// visitors cost no DNS traffic at all.
pub const CACHE_TTL_SECS: u64 = 3600;

/// Timeout for a single DNS-over-HTTPS query.
pub const DNS_TIMEOUT: Duration = Duration::from_millis(5000);

/// Overall deadline for resolving one request's destination.
///
/// Covers the worst case of `MAX_LOOKUPS_PER_REQUEST` sequential queries each
/// hitting the per-query timeout, plus a small margin. A request that blows
/// this deadline is answered with 504 rather than held open.
pub const RESOLVE_DEADLINE: Duration = Duration::from_secs(30);

/// Maximum number of suffix-walk DNS lookups performed for one request.
///
/// Bounds DNS fan-out for adversarial hostnames with many labels.
pub const MAX_LOOKUPS_PER_REQUEST: usize = 5;

/// Maximum total hostname length per RFC 1123.
pub const MAX_HOSTNAME_LENGTH: usize = 253;

/// Maximum length of a single hostname label per RFC 1123.
pub const MAX_SUBDOMAIN_LENGTH: usize = 63;

/// HTTP status used for redirects.
///
/// 307 preserves the request method and body across the redirect, unlike 301/302.
pub const REDIRECT_STATUS: u16 = 307;

/// Value of the `X-Redirect-By` header stamped on every redirect response.
pub const ENGINE_ID: &str = "dns-redirect";

/// Default DNS-over-HTTPS endpoint (must speak `application/dns-json`).
pub const DEFAULT_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Default listen port for the edge service.
pub const DEFAULT_PORT: u16 = 8080;

/// TCP connection timeout for the outbound HTTP client, in seconds.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
