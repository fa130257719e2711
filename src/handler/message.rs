//! Diagnostic body for hosts with no redirect configuration.

use crate::config::{DESTINATION_PREFIX, TXT_PREFIX};

/// Builds the 404 body explaining the expected TXT record convention.
///
/// Names the exact record the owner of `host` must create
/// (`_redirect.<host>`) and shows an example value, so a misconfigured
/// domain is diagnosable from the response alone.
pub fn not_found_message(host: &str, requested_url: &str) -> String {
    format!(
        "No redirect configuration found.\n\
         \n\
         To configure redirects for {host}, create a TXT record:\n\
         Domain: {TXT_PREFIX}{host}\n\
         Content: {DESTINATION_PREFIX}your-target-domain.com\n\
         \n\
         Example DNS Record:\n\
         Type: TXT\n\
         Name: {TXT_PREFIX}{host}\n\
         Value: {DESTINATION_PREFIX}example.com\n\
         \n\
         Requested URL: {requested_url}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_expected_record() {
        let body = not_found_message("unknown.com", "http://unknown.com/page");
        assert!(body.contains("_redirect.unknown.com"));
        assert!(body.contains("destination="));
        assert!(body.contains("http://unknown.com/page"));
    }
}
