//! Configuration types and CLI options.

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_DOH_ENDPOINT, DEFAULT_PORT};

/// Logging level for the service.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration.
///
/// Parsed from the command line by the binary; can also be constructed
/// programmatically when embedding the service.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dns_redirect",
    about = "Edge service that redirects requests to destinations declared in DNS TXT records"
)]
pub struct Config {
    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// DNS-over-HTTPS endpoint (must serve application/dns-json)
    #[arg(long, default_value = DEFAULT_DOH_ENDPOINT)]
    pub doh_endpoint: String,

    /// Cache TTL for resolved destinations, in seconds
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Per-query DNS timeout, in milliseconds
    #[arg(long)]
    pub dns_timeout_ms: Option<u64>,

    /// Overall per-request resolution deadline, in milliseconds
    #[arg(long)]
    pub resolve_deadline_ms: Option<u64>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            cache_ttl_secs: None,
            dns_timeout_ms: None,
            resolve_deadline_ms: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
