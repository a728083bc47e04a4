//! Prometheus recorder for the library's request metrics
//!
//! The `mixcloud` crate only emits through the `metrics` facade. The CLI
//! installs a Prometheus recorder at startup and logs the rendered exposition
//! at debug level before exiting (`LOG_LEVEL=debug` to see it).

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// Bucket boundaries for `mixcloud_request_duration_seconds`, 10ms to 30s.
const DURATION_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

fn builder() -> Result<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("mixcloud_request_duration_seconds".to_string()),
            DURATION_BUCKETS,
        )
        .context("failed to set histogram buckets")
}

/// Install the global recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle> {
    builder()?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_metrics_render_as_histogram() {
        // Local recorder avoids the process-wide singleton
        let recorder = builder().unwrap().build_recorder();
        let handle = recorder.handle();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        mixcloud::metrics::record_request(200, 0.042);
        mixcloud::metrics::record_transport_error("http");

        let output = handle.render();
        assert!(output.contains("mixcloud_requests_total"), "got: {output}");
        assert!(
            output.contains("mixcloud_request_duration_seconds_bucket"),
            "got: {output}"
        );
        assert!(output.contains("le=\"0.05\""), "got: {output}");
        assert!(
            output.contains("error_type=\"http\""),
            "got: {output}"
        );
    }
}
