//! dns_redirect library: DNS TXT-record driven redirect interception
//!
//! This library implements an edge request interceptor that redirects an
//! incoming HTTP request to a different hostname, where the destination is
//! declared in DNS rather than static configuration: a TXT record at
//! `_redirect.<domain>` with the value `destination=<target-domain>`.
//!
//! Resolution walks from the requested hostname toward its parent domains
//! (so one record on `example.com` covers every subdomain), validates the
//! declared destination, caches positive results with a TTL, and composes a
//! 307 redirect that preserves the requester's leading subdomain label, path
//! and query string.
//!
//! # Example
//!
//! ```no_run
//! use dns_redirect::{init_state, serve, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let state = init_state(&config)?;
//! serve(config.port, state).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod doh;
pub mod error_handling;
pub mod handler;
pub mod hostname;
pub mod initialization;
pub mod resolver;
pub mod server;

// Re-export public API
pub use cache::{CacheEntry, DnsCache};
pub use config::{Config, LogFormat, LogLevel};
pub use doh::DohClient;
pub use error_handling::{ErrorStats, ErrorType, RedirectError};
pub use handler::{decide_redirect, RedirectDecision};
pub use initialization::{init_logger_with, init_state};
pub use resolver::DestinationResolver;
pub use server::{router, serve, AppState};
