//! DNS-over-HTTPS lookup of redirect TXT records.
//!
//! This module issues `GET <endpoint>?name=_redirect.<domain>&type=TXT`
//! queries with `Accept: application/dns-json` and parses the provider's
//! JSON response. Every failure fails closed to an empty record list; the
//! engine treats that as "no destination declared here".

mod client;
mod response;

// Re-export public API
pub use client::DohClient;
pub use response::{DnsAnswer, DnsResponse};
