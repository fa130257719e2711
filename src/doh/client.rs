//! DNS-over-HTTPS TXT lookups.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use thiserror::Error;
use url::Url;

use crate::config::TXT_PREFIX;
use crate::doh::response::{DnsResponse, DNS_STATUS_OK};
use crate::error_handling::{ErrorStats, ErrorType};
use crate::hostname::is_valid_hostname;

/// Internal failure modes of one DoH query. Never escapes `resolve_txt`.
#[derive(Error, Debug)]
enum DohError {
    #[error("DNS query failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("DNS query failed: HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("DNS query returned error status: {0}")]
    DnsStatus(i32),

    #[error("DNS response parse error: {0}")]
    Parse(#[source] reqwest::Error),
}

impl DohError {
    fn error_type(&self) -> ErrorType {
        match self {
            DohError::Transport(_) => ErrorType::DnsTransportError,
            DohError::HttpStatus(_) => ErrorType::DnsQueryHttpError,
            DohError::DnsStatus(_) => ErrorType::DnsQueryStatusError,
            DohError::Parse(_) => ErrorType::DnsParseError,
        }
    }
}

/// Client for `_redirect.<domain>` TXT lookups against a dns-json endpoint.
///
/// All failure modes degrade to an empty record list: non-success HTTP
/// status, non-zero DNS status, timeout, transport error, parse error. Each
/// is logged with the failing hostname and counted in [`ErrorStats`]; none
/// reaches the caller as an error.
pub struct DohClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    error_stats: Arc<ErrorStats>,
}

impl DohClient {
    /// Creates a client against the given dns-json endpoint.
    ///
    /// # Arguments
    ///
    /// * `http` - Shared HTTP client
    /// * `endpoint` - DoH endpoint URL, e.g. `https://cloudflare-dns.com/dns-query`
    /// * `timeout` - Per-query deadline
    /// * `error_stats` - Shared fault counters
    pub fn new(
        http: reqwest::Client,
        endpoint: Url,
        timeout: Duration,
        error_stats: Arc<ErrorStats>,
    ) -> Self {
        DohClient {
            http,
            endpoint,
            timeout,
            error_stats,
        }
    }

    /// Queries the TXT records published at `_redirect.<domain>`.
    ///
    /// Validates `domain` first; an invalid domain short-circuits to an empty
    /// result without a network call. Each returned value has its surrounding
    /// quote characters stripped. Bounded by the per-query timeout; a timed
    /// out or failed query returns an empty list.
    pub async fn resolve_txt(&self, domain: &str) -> Vec<String> {
        if !is_valid_hostname(domain) {
            log::warn!("Invalid hostname format: {domain}");
            self.error_stats.increment(ErrorType::InvalidLookupHostname);
            return Vec::new();
        }

        let name = format!("{TXT_PREFIX}{domain}");
        match tokio::time::timeout(self.timeout, self.query(&name)).await {
            Ok(Ok(values)) => values,
            Ok(Err(e)) => {
                log::error!("DNS lookup failed for {domain}: {e}");
                self.error_stats.increment(e.error_type());
                Vec::new()
            }
            Err(_) => {
                log::error!("DNS lookup timeout for {domain}");
                self.error_stats.increment(ErrorType::DnsLookupTimeout);
                Vec::new()
            }
        }
    }

    async fn query(&self, name: &str) -> Result<Vec<String>, DohError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("type", "TXT");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/dns-json")
            .send()
            .await
            .map_err(DohError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DohError::HttpStatus(status));
        }

        let records: DnsResponse = response.json().await.map_err(DohError::Parse)?;
        if records.status != DNS_STATUS_OK {
            return Err(DohError::DnsStatus(records.status));
        }

        Ok(records.txt_values())
    }
}
