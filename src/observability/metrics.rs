//! # Response Metrics
//!
//! Counters and histograms for written responses, recorded through the
//! `metrics` facade. Without an installed recorder every call is a no-op; the
//! host service decides which exporter to install.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics recorder for the response writer
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMetrics;

impl ResponseMetrics {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Register metric descriptions with the installed recorder
    pub fn describe() {
        describe_counter!("http_responses_written_total", "Responses written by status and content type");
        describe_histogram!("http_response_body_bytes", Unit::Bytes, "Encoded response body size");
        describe_counter!(
            "schema_inference_failures_total",
            "Responses rejected because the body could not be parsed for the schema header"
        );
        describe_counter!("http_response_write_failures_total", "Transport failures while writing a body");
    }

    /// Record a response that was fully written
    pub fn record_response(&self, status: u16, json: bool, body_bytes: usize) {
        let labels = [
            ("status", status.to_string()),
            ("content_type", if json { "json" } else { "text" }.to_string()),
        ];
        counter!("http_responses_written_total", &labels).increment(1);
        histogram!("http_response_body_bytes").record(body_bytes as f64);
    }

    /// Record a body that could not be parsed for the schema header
    pub fn record_schema_failure(&self) {
        counter!("schema_inference_failures_total").increment(1);
    }

    /// Record a transport failure
    pub fn record_write_failure(&self) {
        counter!("http_response_write_failures_total").increment(1);
    }
}
