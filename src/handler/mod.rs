//! Redirect decision handling.
//!
//! A state machine over a single request with terminal outcomes only: the
//! request passes through untouched, is redirected, or receives an error
//! response. The handler never propagates a fault to its caller; anything
//! unexpected is classified and converted into an error decision.

mod message;

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::{ENGINE_ID, MAX_HOSTNAME_LENGTH, MAX_SUBDOMAIN_LENGTH, REDIRECT_STATUS};
use crate::error_handling::{ErrorStats, ErrorType, RedirectError};
use crate::hostname::{is_ip_address, is_valid_hostname};
use crate::resolver::DestinationResolver;

pub use message::not_found_message;

/// Terminal outcome for one intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Forward the request unmodified; no redirect, no error.
    PassThrough,
    /// Redirect to `location` with the given status and headers.
    Redirect {
        /// Fully composed destination URL.
        location: String,
        /// Redirect status code (307, method/body preserving).
        status: u16,
        /// Response headers accompanying the redirect.
        headers: Vec<(&'static str, &'static str)>,
    },
    /// Answer with an error status and plain-text body.
    Error {
        /// HTTP status code.
        status: u16,
        /// Plain-text response body.
        body: String,
    },
}

impl RedirectDecision {
    fn error(status: u16, body: impl Into<String>) -> Self {
        RedirectDecision::Error {
            status,
            body: body.into(),
        }
    }
}

/// Headers stamped on every redirect response.
fn redirect_headers() -> Vec<(&'static str, &'static str)> {
    vec![("cache-control", "no-cache"), ("x-redirect-by", ENGINE_ID)]
}

/// Decides how to answer one intercepted request.
///
/// # Arguments
///
/// * `resolver` - Shared resolution engine
/// * `error_stats` - Shared fault counters
/// * `scheme` - Scheme of the incoming request (`http` or `https`)
/// * `host_header` - Raw `Host` header value, if present
/// * `path_and_query` - Original path and query string, preserved verbatim
/// * `deadline` - Overall resolution deadline, normally
///   [`crate::config::RESOLVE_DEADLINE`]
///
/// Always returns a decision. Faults are classified at the top: format-class
/// faults yield 400, a blown resolution deadline yields 504, anything else
/// yields 500; every fault is logged before responding.
pub async fn decide_redirect(
    resolver: &Arc<DestinationResolver>,
    error_stats: &Arc<ErrorStats>,
    scheme: &str,
    host_header: Option<&str>,
    path_and_query: &str,
    deadline: Duration,
) -> RedirectDecision {
    match decide_inner(
        resolver,
        error_stats,
        scheme,
        host_header,
        path_and_query,
        deadline,
    )
    .await
    {
        Ok(decision) => decision,
        Err(e) => {
            log::error!("redirect handler fault for {host_header:?}: {e}");
            if matches!(e, RedirectError::Internal(_)) {
                error_stats.increment(ErrorType::HandlerInternalError);
            }
            RedirectDecision::error(e.status(), e.body())
        }
    }
}

async fn decide_inner(
    resolver: &Arc<DestinationResolver>,
    error_stats: &Arc<ErrorStats>,
    scheme: &str,
    host_header: Option<&str>,
    path_and_query: &str,
    deadline: Duration,
) -> Result<RedirectDecision, RedirectError> {
    let host = match host_header {
        Some(h) if !h.is_empty() => h.to_lowercase(),
        // Host-agnostic requests (internal probes) are not redirect candidates
        _ => return Ok(RedirectDecision::PassThrough),
    };

    // Never redirect raw IP access; the colon heuristic also lets
    // host:port forms through untouched
    if is_ip_address(&host) {
        return Ok(RedirectDecision::PassThrough);
    }

    if !is_valid_hostname(&host) {
        return Ok(RedirectDecision::error(400, "Invalid hostname format"));
    }

    let destination = resolve_detached(resolver, error_stats, &host, deadline).await?;
    let Some(destination) = destination else {
        let requested_url = format!("{scheme}://{host}{path_and_query}");
        return Ok(RedirectDecision::error(
            404,
            not_found_message(&host, &requested_url),
        ));
    };

    let subdomain = host.split('.').next().unwrap_or_default();
    if subdomain.len() > MAX_SUBDOMAIN_LENGTH {
        return Ok(RedirectDecision::error(400, "Subdomain too long"));
    }

    let new_hostname = format!("{subdomain}.{destination}");
    if new_hostname.len() > MAX_HOSTNAME_LENGTH {
        return Ok(RedirectDecision::error(400, "Resulting hostname too long"));
    }

    // Same scheme, new hostname, original path and query preserved verbatim
    let location = format!("{scheme}://{new_hostname}{path_and_query}");
    let location = Url::parse(&location)
        .map_err(|e| RedirectError::InvalidFormat(format!("{location}: {e}")))?;

    Ok(RedirectDecision::Redirect {
        location: location.to_string(),
        status: REDIRECT_STATUS,
        headers: redirect_headers(),
    })
}

/// Runs the engine on a detached task under the overall deadline.
///
/// Detaching means a cancelled caller (client disconnect, blown deadline)
/// does not cancel in-flight DNS work: the walk still completes and
/// populates the cache, its result just reaches no one.
async fn resolve_detached(
    resolver: &Arc<DestinationResolver>,
    error_stats: &Arc<ErrorStats>,
    host: &str,
    deadline: Duration,
) -> Result<Option<String>, RedirectError> {
    let resolver = Arc::clone(resolver);
    let host = host.to_string();
    let task = tokio::spawn(async move { resolver.resolve(&host).await });

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(destination)) => Ok(destination),
        Ok(Err(join_error)) => Err(RedirectError::Internal(join_error.to_string())),
        Err(_) => {
            error_stats.increment(ErrorType::ResolveDeadlineExceeded);
            Err(RedirectError::Timeout)
        }
    }
}
