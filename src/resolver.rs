//! Destination resolution engine.
//!
//! Orchestrates cache lookup, the progressive domain-suffix walk, and cache
//! population. Given `a.b.example.com`, the engine probes
//! `_redirect.a.b.example.com`, then `_redirect.b.example.com`, then
//! `_redirect.example.com`, stopping when fewer than two labels remain or
//! after `MAX_LOOKUPS_PER_REQUEST` queries. A single TXT record on a parent
//! domain thereby covers all of its subdomains.

use std::sync::Arc;

use crate::cache::DnsCache;
use crate::config::{DESTINATION_PREFIX, MAX_LOOKUPS_PER_REQUEST};
use crate::doh::DohClient;
use crate::error_handling::{ErrorStats, ErrorType};
use crate::hostname::{is_valid_destination, is_valid_hostname};

/// Resolves hostnames to redirect destinations via cache and suffix walk.
pub struct DestinationResolver {
    cache: Arc<DnsCache>,
    doh: Arc<DohClient>,
    error_stats: Arc<ErrorStats>,
}

impl DestinationResolver {
    /// Creates an engine over a shared cache and DoH client.
    pub fn new(cache: Arc<DnsCache>, doh: Arc<DohClient>, error_stats: Arc<ErrorStats>) -> Self {
        DestinationResolver {
            cache,
            doh,
            error_stats,
        }
    }

    /// The cache this engine populates.
    pub fn cache(&self) -> &Arc<DnsCache> {
        &self.cache
    }

    /// Resolves the redirect destination for a hostname, or `None` when no
    /// valid `destination=` record exists within the lookup budget.
    ///
    /// A destination found at a parent domain is cached under that domain
    /// (so sibling subdomains reuse the entry) and under the original
    /// hostname (so repeat resolutions are pure cache hits). Failed walks are
    /// not negatively cached; they re-query on the next request, bounded by
    /// the per-request budget.
    pub async fn resolve(&self, hostname: &str) -> Option<String> {
        if hostname.is_empty() || !is_valid_hostname(hostname) {
            return None;
        }

        if let Some(destination) = self.cache.lookup(hostname) {
            log::debug!("cache hit for {hostname} -> {destination}");
            return Some(destination);
        }

        let labels: Vec<&str> = hostname.split('.').collect();
        let mut lookups = 0;
        let mut start = 0;

        while labels.len() - start >= 2 && lookups < MAX_LOOKUPS_PER_REQUEST {
            lookups += 1;
            let current_domain = labels[start..].join(".");

            // Parent levels may already be cached from a sibling's walk; the
            // full hostname was checked above.
            if start > 0 {
                if let Some(destination) = self.cache.lookup(&current_domain) {
                    log::debug!("cache hit at {current_domain} for {hostname} -> {destination}");
                    self.cache.put(hostname, &destination);
                    return Some(destination);
                }
            }

            let records = self.doh.resolve_txt(&current_domain).await;
            if let Some(destination) = self.extract_destination(&current_domain, &records) {
                self.cache.put(&current_domain, &destination);
                if current_domain != hostname {
                    self.cache.put(hostname, &destination);
                }
                log::info!("resolved {hostname} -> {destination} via {current_domain}");
                return Some(destination);
            }

            start += 1;
        }

        log::debug!("no destination found for {hostname} after {lookups} lookups");
        None
    }

    /// Scans TXT records in order for the first valid `destination=` value.
    /// Records with an invalid destination (wildcard, IP literal, malformed)
    /// are skipped and scanning continues.
    fn extract_destination(&self, domain: &str, records: &[String]) -> Option<String> {
        for record in records {
            if !record.starts_with(DESTINATION_PREFIX) {
                continue;
            }
            let candidate = record
                .split('=')
                .nth(1)
                .map(str::trim)
                .unwrap_or_default();
            if !candidate.is_empty() && is_valid_destination(candidate) {
                return Some(candidate.to_string());
            }
            log::warn!("rejecting invalid destination {candidate:?} declared at {domain}");
            self.error_stats.increment(ErrorType::InvalidDestination);
        }
        None
    }
}
