// Prometheus metrics registry and collectors

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_int_counter_with_registry, CounterVec, Encoder, HistogramVec, IntCounter, Opts,
    Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of inbound requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of inbound requests"),
        &["endpoint", "status_code"],
        REGISTRY
    ).expect("requests_total registers once");

    /// Inbound request duration (time to response headers for streams)
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 300.0]),
        &["endpoint"],
        REGISTRY
    ).expect("request_duration_seconds registers once");

    // ============================================================================
    // UPSTREAM METRICS
    // ============================================================================

    /// Calls made to the upstream backend
    pub static ref UPSTREAM_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("upstream_calls_total", "Total upstream calls"),
        &["operation", "status_code"], // operation: chat, chat_stream, models
        REGISTRY
    ).expect("upstream_calls_total registers once");

    /// Upstream call duration
    pub static ref UPSTREAM_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("upstream_duration_seconds", "Upstream call duration")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 300.0]),
        &["operation"],
        REGISTRY
    ).expect("upstream_duration_seconds registers once");

    /// Model listings answered from the configured fallback
    pub static ref MODEL_LIST_FALLBACKS: IntCounter = register_int_counter_with_registry!(
        Opts::new("model_list_fallbacks_total", "Model listings served from the fallback"),
        REGISTRY
    ).expect("model_list_fallbacks_total registers once");

    // ============================================================================
    // VISION METRICS
    // ============================================================================

    /// Image blocks injected into forwarded requests
    pub static ref IMAGES_INJECTED: IntCounter = register_int_counter_with_registry!(
        Opts::new("images_injected_total", "Image blocks injected into chat messages"),
        REGISTRY
    ).expect("images_injected_total registers once");

    // ============================================================================
    // STREAMING METRICS
    // ============================================================================

    /// Chunks relayed to callers
    pub static ref STREAM_CHUNKS: IntCounter = register_int_counter_with_registry!(
        Opts::new("stream_chunks_total", "Stream chunks relayed"),
        REGISTRY
    ).expect("stream_chunks_total registers once");

    /// Bytes relayed to callers
    pub static ref STREAM_BYTES: IntCounter = register_int_counter_with_registry!(
        Opts::new("stream_bytes_total", "Stream bytes relayed"),
        REGISTRY
    ).expect("stream_bytes_total registers once");

    /// Stream lifecycle events
    pub static ref STREAM_CONNECTIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("stream_connections_total", "Total relayed streams"),
        &["status"], // status: opened, completed, error
        REGISTRY
    ).expect("stream_connections_total registers once");
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
