//! Metrics and observability utilities
//!
//! Metric descriptions and record helpers for the chat pipeline.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics prefix for all service metrics
pub const METRICS_PREFIX: &str = "shastra";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_chat_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of chat requests"
    );

    describe_counter!(
        format!("{}_chat_refusals_total", METRICS_PREFIX),
        Unit::Count,
        "Chat requests answered with the fixed refusal (empty retrieval)"
    );

    describe_counter!(
        format!("{}_chat_grounded_total", METRICS_PREFIX),
        Unit::Count,
        "Chat requests answered from retrieved context"
    );

    describe_histogram!(
        format!("{}_chat_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "End-to-end chat request latency in seconds"
    );

    describe_histogram!(
        format!("{}_retrieval_sections_count", METRICS_PREFIX),
        Unit::Count,
        "Sections retrieved per grounded request"
    );

    describe_histogram!(
        format!("{}_retrieval_concepts_count", METRICS_PREFIX),
        Unit::Count,
        "Concepts retrieved per grounded request"
    );

    describe_counter!(
        format!("{}_completion_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Completion service failures"
    );
}

/// Record a refused chat request
pub fn record_chat_refusal(mode: &str) {
    counter!(format!("{}_chat_requests_total", METRICS_PREFIX), "mode" => mode.to_string())
        .increment(1);
    counter!(format!("{}_chat_refusals_total", METRICS_PREFIX), "mode" => mode.to_string())
        .increment(1);
}

/// Record a grounded chat request
pub fn record_chat_grounded(mode: &str, sections: usize, concepts: usize) {
    counter!(format!("{}_chat_requests_total", METRICS_PREFIX), "mode" => mode.to_string())
        .increment(1);
    counter!(format!("{}_chat_grounded_total", METRICS_PREFIX), "mode" => mode.to_string())
        .increment(1);
    histogram!(format!("{}_retrieval_sections_count", METRICS_PREFIX))
        .record(sections as f64);
    histogram!(format!("{}_retrieval_concepts_count", METRICS_PREFIX))
        .record(concepts as f64);
}

/// Record end-to-end request latency
pub fn record_chat_latency(seconds: f64, mode: &str) {
    histogram!(format!("{}_chat_duration_seconds", METRICS_PREFIX), "mode" => mode.to_string())
        .record(seconds);
}

/// Record a completion service failure
pub fn record_completion_error(status: u16) {
    counter!(
        format!("{}_completion_errors_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);
}
