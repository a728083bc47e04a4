//! HTTP response parsing and validation
//!
//! A raw response is a header block followed by the body, with the header
//! block length reported by the transport. Header names are normalized to
//! lowercase with `-` replaced by `_` (`Content-Type` becomes `content_type`).

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};

/// Snapshot of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Normalized header name to trimmed value; empty when headers were not captured
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    /// Assemble a response from raw transport output.
    ///
    /// With `capture_headers` the first `header_size` bytes are parsed as the
    /// header block; otherwise the whole payload is the body.
    pub fn from_raw(status: u16, data: &[u8], header_size: usize, capture_headers: bool) -> Self {
        let (head, body) = split_raw_response(data, header_size, capture_headers);
        Self {
            status,
            headers: head.map(parse_headers).unwrap_or_default(),
            body,
        }
    }

    /// Fails with `InvalidHttpResponseCode` unless the status is accepted.
    pub fn validate(&self) -> Result<()> {
        if is_success_status(self.status) {
            Ok(())
        } else {
            Err(Error::InvalidHttpResponseCode {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value> {
        decode_json(&self.body)
    }

    /// Header value by normalized name (`content_type`, `x_ratelimit_limit`).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Split a raw payload into its header block and body.
///
/// `header_size` past the end of the payload is clamped. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn split_raw_response(
    data: &[u8],
    header_size: usize,
    capture_headers: bool,
) -> (Option<String>, String) {
    if !capture_headers {
        return (None, String::from_utf8_lossy(data).into_owned());
    }
    let split = header_size.min(data.len());
    let (head, body) = data.split_at(split);
    (
        Some(String::from_utf8_lossy(head).into_owned()),
        String::from_utf8_lossy(body).into_owned(),
    )
}

/// Parse a raw header block into a normalized header map.
///
/// Lines without a `": "` separator (the status line, blank lines) are
/// skipped. Only the first separator splits, so values may contain colons.
/// A repeated header keeps its last value.
pub fn parse_headers(raw: impl AsRef<str>) -> HashMap<String, String> {
    raw.as_ref()
        .trim()
        .split('\n')
        .filter_map(|line| line.split_once(": "))
        .map(|(key, value)| {
            (
                key.to_lowercase().replace('-', "_"),
                value.trim().to_string(),
            )
        })
        .collect()
}

/// Whether `status` counts as success: 200 through 209 only.
///
/// 210-299 are rejected along with every other class.
pub fn is_success_status(status: u16) -> bool {
    (200..=209).contains(&status)
}

/// Decode a JSON body. An empty body decodes to `null`.
pub fn decode_json(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))
}
