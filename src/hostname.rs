//! Hostname validation.
//!
//! Pure predicate functions classifying a string as a syntactically valid
//! hostname, an IP literal, or a safe redirect destination. These are total
//! functions: invalid input simply yields `false`, never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::MAX_HOSTNAME_LENGTH;

/// RFC 1123 hostname: dot-separated labels of 1-63 alphanumeric characters
/// with interior hyphens, no leading or trailing hyphen per label.
static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("hostname regex is valid")
});

/// Dotted-quad IPv4 pattern. Octet range is deliberately not checked; this is
/// a redirect-safety filter, not an address parser.
static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("ipv4 regex is valid"));

/// Checks whether a string is a syntactically valid hostname per RFC 1123.
///
/// Returns `false` for empty strings and strings longer than 253 characters.
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > MAX_HOSTNAME_LENGTH {
        return false;
    }
    HOSTNAME_RE.is_match(hostname)
}

/// Checks whether a string looks like an IP literal.
///
/// Matches dotted-quad IPv4, or treats any string containing a colon as IPv6.
/// The colon heuristic is deliberately coarse: it also catches `host:port`
/// forms, which are equally unsuitable as redirect candidates.
pub fn is_ip_address(hostname: &str) -> bool {
    IPV4_RE.is_match(hostname) || hostname.contains(':')
}

/// Checks whether a TXT-record value is acceptable as a redirect destination.
///
/// A valid destination is a non-empty RFC 1123 hostname that contains no
/// wildcard character and is not an IP literal.
pub fn is_valid_destination(destination: &str) -> bool {
    !destination.is_empty()
        && is_valid_hostname(destination)
        && !destination.contains('*')
        && !is_ip_address(destination)
}
