// Metrics module for Prometheus observability

mod registry;

pub use registry::{
    gather_metrics,
    IMAGES_INJECTED,
    MODEL_LIST_FALLBACKS,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    STREAM_BYTES,
    STREAM_CHUNKS,
    STREAM_CONNECTIONS,
    UPSTREAM_CALLS,
    UPSTREAM_DURATION,
};

/// Helper to record inbound request metrics
pub fn record_request(endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record upstream call metrics. `status_code` is 0 when no
/// response was received.
pub fn record_upstream_call(operation: &str, status_code: u16, duration_secs: f64) {
    UPSTREAM_CALLS
        .with_label_values(&[operation, &status_code.to_string()])
        .inc();

    UPSTREAM_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
}

pub fn record_images_injected(count: usize) {
    IMAGES_INJECTED.inc_by(count as u64);
}

pub fn record_model_list_fallback() {
    MODEL_LIST_FALLBACKS.inc();
}

/// Helper to record relayed stream chunks
pub fn record_stream_chunk(len: usize) {
    STREAM_CHUNKS.inc();
    STREAM_BYTES.inc_by(len as u64);
}

pub fn record_stream_connection(status: &str) {
    STREAM_CONNECTIONS.with_label_values(&[status]).inc();
}
