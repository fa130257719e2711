//! dns-json response model.
//!
//! The provider's JSON is an untrusted external schema: required fields are
//! validated by deserialization, optional fields default, and anything that
//! does not fit fails closed in the client.

use serde::Deserialize;

/// DNS status code for a successful query.
pub const DNS_STATUS_OK: i32 = 0;

/// One answer record from a dns-json response.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsAnswer {
    /// Owner name of the record.
    pub name: String,
    /// Numeric record type (TXT = 16).
    #[serde(rename = "type")]
    pub record_type: u16,
    /// Record TTL as reported by the provider. Informational only; the
    /// cache applies its own TTL.
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    /// Record payload. TXT values arrive wrapped in quote characters.
    pub data: String,
}

/// Top-level dns-json response.
///
/// `Status` is required; a response without it is a parse failure. `Answer`
/// is legitimately absent when the name has no records.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsResponse {
    /// DNS response status (0 = NOERROR).
    #[serde(rename = "Status")]
    pub status: i32,
    /// Answer records, absent for empty results.
    #[serde(rename = "Answer")]
    pub answer: Option<Vec<DnsAnswer>>,
}

impl DnsResponse {
    /// Extracts the TXT values from the answer section, stripping the
    /// surrounding quote characters the dns-json encoding adds.
    pub fn txt_values(&self) -> Vec<String> {
        self.answer
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|answer| strip_quotes(&answer.data).to_string())
            .collect()
    }
}

/// Removes one leading and one trailing quote character, if present.
fn strip_quotes(data: &str) -> &str {
    let data = data.strip_prefix('"').unwrap_or(data);
    data.strip_suffix('"').unwrap_or(data)
}
