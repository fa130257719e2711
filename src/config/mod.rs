//! Service configuration and constants.
//!
//! This module provides:
//! - Operational constants (TXT record convention, timeouts, limits)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
