//! Service initialization and resource setup.
//!
//! Builds the shared resources the service runs on: the logger, the outbound
//! HTTP client, and the application state (cache, DoH client, resolution
//! engine, fault counters).

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use log::LevelFilter;
use url::Url;

use crate::cache::DnsCache;
use crate::config::{
    Config, LogFormat, CACHE_TTL_SECS, DNS_TIMEOUT, HTTP_CONNECT_TIMEOUT_SECS, RESOLVE_DEADLINE,
};
use crate::doh::DohClient;
use crate::error_handling::{ErrorStats, InitializationError};
use crate::resolver::DestinationResolver;
use crate::server::AppState;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. The logger reads from the
/// `RUST_LOG` environment variable by default; the provided `level` overrides
/// it, so `--log-level` wins over the environment.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if logger setup fails.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("dns_redirect", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };
                let emoji = match level {
                    log::Level::Error => "❌",
                    log::Level::Warn => "⚠️",
                    log::Level::Info => "✔️",
                    log::Level::Debug => "🔍",
                    log::Level::Trace => "🔬",
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    emoji,
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init() instead of init() so tests can initialize repeatedly
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Initializes the outbound HTTP client used for DoH queries.
///
/// The request timeout matches the per-query DNS deadline; the connect
/// timeout fails fast on unreachable endpoints.
pub fn init_http_client(request_timeout: Duration) -> Result<reqwest::Client, InitializationError> {
    let client = reqwest::ClientBuilder::new()
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// Builds the application state from configuration.
///
/// The cache is constructed exactly once here and shared by reference into
/// the engine; its lifetime is the process lifetime.
///
/// # Errors
///
/// Returns an error if the DoH endpoint is not a valid URL or the HTTP
/// client cannot be built.
pub fn init_state(config: &Config) -> Result<AppState, InitializationError> {
    let dns_timeout = config
        .dns_timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(DNS_TIMEOUT);
    let cache_ttl = Duration::from_secs(config.cache_ttl_secs.unwrap_or(CACHE_TTL_SECS));
    let resolve_deadline = config
        .resolve_deadline_ms
        .map(Duration::from_millis)
        .unwrap_or(RESOLVE_DEADLINE);
    let endpoint = Url::parse(&config.doh_endpoint)?;

    let error_stats = Arc::new(ErrorStats::new());
    let cache = Arc::new(DnsCache::with_ttl(cache_ttl));
    let http = init_http_client(dns_timeout)?;
    let doh = Arc::new(DohClient::new(
        http,
        endpoint,
        dns_timeout,
        Arc::clone(&error_stats),
    ));
    let resolver = Arc::new(DestinationResolver::new(
        Arc::clone(&cache),
        doh,
        Arc::clone(&error_stats),
    ));

    Ok(AppState {
        cache,
        resolver,
        error_stats,
        resolve_deadline,
    })
}
