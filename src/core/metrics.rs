//! Process-wide metrics registry
//!
//! Created once at startup and handed to every component that records
//! telemetry. The prometheus collectors are internally synchronized, so
//! concurrent observations from in-flight requests never lose updates.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::header, response::IntoResponse};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::core::error::AppError;
use crate::core::instrumentation::OperationLabel;

const OPERATION_LABELS: &[&str] = &["boundary", "component", "operation"];
const REQUEST_LABELS: &[&str] = &["method", "path"];

pub struct Metrics {
    registry: Registry,
    operation_duration: HistogramVec,
    operation_errors: IntCounterVec,
    http_requests: IntCounterVec,
}

impl Metrics {
    pub fn new(namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "operation_duration_seconds",
                "Elapsed time of instrumented operations",
            )
            .namespace(namespace),
            OPERATION_LABELS,
        )?;
        let operation_errors = IntCounterVec::new(
            Opts::new(
                "operation_errors_total",
                "Number of instrumented operations that failed",
            )
            .namespace(namespace),
            OPERATION_LABELS,
        )?;
        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Number of inbound API calls").namespace(namespace),
            REQUEST_LABELS,
        )?;

        registry.register(Box::new(operation_duration.clone()))?;
        registry.register(Box::new(operation_errors.clone()))?;
        registry.register(Box::new(http_requests.clone()))?;

        Ok(Self {
            registry,
            operation_duration,
            operation_errors,
            http_requests,
        })
    }

    pub fn observe_duration(&self, label: &OperationLabel, elapsed: Duration) {
        self.operation_duration
            .with_label_values(&label.values())
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_error(&self, label: &OperationLabel) {
        self.operation_errors
            .with_label_values(&label.values())
            .inc();
    }

    pub fn record_request(&self, method: &str, path: &str) {
        self.http_requests.with_label_values(&[method, path]).inc();
    }

    /// Number of timing observations recorded for `label`
    pub fn duration_count(&self, label: &OperationLabel) -> u64 {
        self.operation_duration
            .with_label_values(&label.values())
            .get_sample_count()
    }

    pub fn error_count(&self, label: &OperationLabel) -> u64 {
        self.operation_errors
            .with_label_values(&label.values())
            .get()
    }

    pub fn request_count(&self, method: &str, path: &str) -> u64 {
        self.http_requests.with_label_values(&[method, path]).get()
    }

    /// Render every registered collector in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Scrape endpoint exposing the registry
pub async fn metrics_handler(
    State(metrics): State<Arc<Metrics>>,
) -> Result<impl IntoResponse, AppError> {
    let body = metrics
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render metrics: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
