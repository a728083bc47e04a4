//! Request metrics
//!
//! Emitted through the `metrics` facade; the host application decides whether
//! to install a recorder. Without one every call is a no-op.
//!
//! - `mixcloud_requests_total` (counter): label `status`
//! - `mixcloud_request_duration_seconds` (histogram): label `status`
//! - `mixcloud_transport_errors_total` (counter): label `error_type`

/// Record a completed request with its status code.
pub fn record_request(status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!("mixcloud_requests_total", "status" => status_str.clone()).increment(1);
    metrics::histogram!("mixcloud_request_duration_seconds", "status" => status_str)
        .record(duration_secs);
}

/// Record a request that failed before a status code was received.
pub fn record_transport_error(error_type: &str) {
    metrics::counter!("mixcloud_transport_errors_total", "error_type" => error_type.to_string())
        .increment(1);
}
