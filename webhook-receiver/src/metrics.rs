//! Request metrics.
//!
//! Handlers talk to a [`RequestRecorder`] rather than a global registry, so
//! the Prometheus-backed recorder can be swapped for a fake in tests.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;

/// Counter of completed webhook requests, labeled by method.
pub const REQUESTS_TOTAL: &str = "webhook_requests_total";

/// Histogram of webhook handler durations in seconds, labeled by method.
pub const REQUEST_DURATION_SECONDS: &str = "webhook_request_duration_seconds";

/// Histogram bucket upper bounds in seconds.
pub const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Errors raised while building or rendering metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metrics output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Sink for per-request measurements.
pub trait RequestRecorder: Send + Sync {
    /// Record one completed request with its wall-clock duration.
    fn record_request(&self, method: &str, duration_seconds: f64);

    /// Render the current state in the Prometheus text exposition format.
    fn render(&self) -> Result<String, MetricsError>;
}

/// Recorder backed by a private Prometheus registry.
pub struct PrometheusRecorder {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl PrometheusRecorder {
    /// Create the registry and register both instruments, plus process
    /// statistics where the platform exposes them.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Total number of webhook requests by method"),
            &["method"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(REQUEST_DURATION_SECONDS, "Duration of webhook requests")
                .buckets(DURATION_BUCKETS.to_vec()),
            &["method"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
        })
    }
}

impl RequestRecorder for PrometheusRecorder {
    fn record_request(&self, method: &str, duration_seconds: f64) {
        self.request_duration
            .with_label_values(&[method])
            .observe(duration_seconds);
        self.requests_total.with_label_values(&[method]).inc();
    }

    fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increments_per_method() {
        let recorder = PrometheusRecorder::new().unwrap();
        recorder.record_request("GET", 0.001);
        recorder.record_request("GET", 0.002);
        recorder.record_request("POST", 0.003);

        assert_eq!(recorder.requests_total.with_label_values(&["GET"]).get(), 2);
        assert_eq!(recorder.requests_total.with_label_values(&["POST"]).get(), 1);
    }

    #[test]
    fn test_histogram_counts_every_observation() {
        let recorder = PrometheusRecorder::new().unwrap();
        recorder.record_request("POST", 0.004);
        recorder.record_request("POST", 12.0);

        let histogram = recorder.request_duration.with_label_values(&["POST"]);
        assert_eq!(histogram.get_sample_count(), 2);
        assert!((histogram.get_sample_sum() - 12.004).abs() < 1e-9);
    }

    #[test]
    fn test_render_exposition() {
        let recorder = PrometheusRecorder::new().unwrap();
        recorder.record_request("PUT", 0.02);

        let text = recorder.render().unwrap();
        assert!(text.contains("# HELP webhook_requests_total Total number of webhook requests by method"));
        assert!(text.contains(r#"webhook_requests_total{method="PUT"} 1"#));
        assert!(text.contains(r#"webhook_request_duration_seconds_count{method="PUT"} 1"#));
        assert!(text.contains(r#"webhook_request_duration_seconds_bucket{method="PUT",le="0.025"} 1"#));
        assert!(text.contains(r#"webhook_request_duration_seconds_bucket{method="PUT",le="0.01"} 0"#));
    }

    #[test]
    fn test_render_before_any_request() {
        let recorder = PrometheusRecorder::new().unwrap();
        let text = recorder.render().unwrap();
        assert!(!text.contains("webhook_requests_total{"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_render_includes_process_metrics() {
        let recorder = PrometheusRecorder::new().unwrap();
        let text = recorder.render().unwrap();
        assert!(text.contains("process_cpu_seconds_total"));
        assert!(text.contains("process_resident_memory_bytes"));
    }

    #[test]
    fn test_bucket_layout() {
        let recorder = PrometheusRecorder::new().unwrap();
        recorder.record_request("GET", 0.0);
        let text = recorder.render().unwrap();
        for le in ["0.005", "0.01", "0.025", "0.05", "0.1", "0.25", "0.5", "1", "2.5", "5", "10", "+Inf"] {
            let sample = format!(r#"webhook_request_duration_seconds_bucket{{method="GET",le="{}"}} 1"#, le);
            assert!(text.contains(&sample), "missing bucket {}", le);
        }
    }
}
