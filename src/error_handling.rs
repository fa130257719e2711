//! Error taxonomy and fault counters.
//!
//! DNS- and parsing-level faults are absorbed inside the DoH client and the
//! resolution engine and degrade to "no destination found"; they are counted
//! here and logged, never propagated. Only handler-level faults surface as
//! HTTP statuses, classified by [`RedirectError`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured DNS-over-HTTPS endpoint is not a valid URL.
    #[error("Invalid DoH endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Handler-level fault classification.
///
/// The redirect handler never propagates these to its caller; it converts
/// each into the matching error response via [`RedirectError::status`] and
/// [`RedirectError::body`].
#[derive(Error, Debug)]
pub enum RedirectError {
    /// The request could not be interpreted (malformed URL composition, etc.).
    #[error("invalid request format: {0}")]
    InvalidFormat(String),

    /// Destination resolution exceeded the overall deadline.
    #[error("destination resolution timed out")]
    Timeout,

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RedirectError {
    /// HTTP status for this fault class.
    pub fn status(&self) -> u16 {
        match self {
            RedirectError::InvalidFormat(_) => 400,
            RedirectError::Timeout => 504,
            RedirectError::Internal(_) => 500,
        }
    }

    /// Response body for this fault class.
    pub fn body(&self) -> &'static str {
        match self {
            RedirectError::InvalidFormat(_) => "Invalid request format",
            RedirectError::Timeout => "Request timeout",
            RedirectError::Internal(_) => "Internal Server Error",
        }
    }
}

/// Types of faults absorbed or surfaced while serving redirects.
///
/// Each variant represents a specific failure mode in the resolution pipeline,
/// tracked for diagnosis of DNS misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// DoH endpoint returned a non-success HTTP status.
    DnsQueryHttpError,
    /// DoH response carried a non-zero DNS status.
    DnsQueryStatusError,
    /// DoH query exceeded its per-query timeout.
    DnsLookupTimeout,
    /// DoH response body failed to parse as dns-json.
    DnsParseError,
    /// Transport-level failure reaching the DoH endpoint.
    DnsTransportError,
    /// A lookup was requested for a syntactically invalid hostname.
    InvalidLookupHostname,
    /// A TXT record carried a destination that failed validation.
    InvalidDestination,
    /// A request's overall resolution deadline elapsed.
    ResolveDeadlineExceeded,
    /// An unclassified handler fault was surfaced as a 500.
    HandlerInternalError,
}

impl ErrorType {
    /// Human-readable name, used in logs and the status endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DnsQueryHttpError => "dns_query_http_error",
            ErrorType::DnsQueryStatusError => "dns_query_status_error",
            ErrorType::DnsLookupTimeout => "dns_lookup_timeout",
            ErrorType::DnsParseError => "dns_parse_error",
            ErrorType::DnsTransportError => "dns_transport_error",
            ErrorType::InvalidLookupHostname => "invalid_lookup_hostname",
            ErrorType::InvalidDestination => "invalid_destination",
            ErrorType::ResolveDeadlineExceeded => "resolve_deadline_exceeded",
            ErrorType::HandlerInternalError => "handler_internal_error",
        }
    }
}

/// Thread-safe fault counters.
///
/// Tracks the count of each fault type using atomic counters, allowing
/// concurrent access from all in-flight requests. Shared via `Arc`.
pub struct ErrorStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl Default for ErrorStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ErrorStats { errors }
    }

    /// Increments the counter for a fault type.
    pub fn increment(&self, error: ErrorType) {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors
            .get(&error)
            .unwrap()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for a fault type.
    pub fn get_count(&self, error: ErrorType) -> usize {
        // All ErrorType variants are initialized in new(), so unwrap() is safe
        self.errors.get(&error).unwrap().load(Ordering::SeqCst)
    }

    /// Snapshot of all counters, for the status endpoint.
    pub fn snapshot(&self) -> Vec<(&'static str, usize)> {
        ErrorType::iter()
            .map(|error| (error.as_str(), self.get_count(error)))
            .collect()
    }
}
