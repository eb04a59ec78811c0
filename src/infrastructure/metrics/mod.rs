//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, route, and status
//! - HTTP request latency histograms
//! - Database connection pool gauges
//! - Domain counters: applications, orders, authentication failures

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

const NAMESPACE: &str = "recruit_sales";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, route, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics")
            .namespace(NAMESPACE),
        &["state"], // "idle", "active", "max"
    )
    .expect("Failed to create DB_POOL_CONNECTIONS metric")
});

/// Applications accepted through either create path
pub static APPLICATIONS_SUBMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("applications_submitted_total", "Job applications accepted")
            .namespace(NAMESPACE),
    )
    .expect("Failed to create APPLICATIONS_SUBMITTED_TOTAL metric")
});

/// Applications refused because the pair already existed
pub static DUPLICATE_APPLICATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "duplicate_applications_total",
            "Job applications rejected as duplicates",
        )
        .namespace(NAMESPACE),
    )
    .expect("Failed to create DUPLICATE_APPLICATIONS_TOTAL metric")
});

pub static ORDERS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("orders_created_total", "Orders created").namespace(NAMESPACE),
    )
    .expect("Failed to create ORDERS_CREATED_TOTAL metric")
});

/// Authentication failures by reason
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("auth_failures_total", "Rejected authentication attempts")
            .namespace(NAMESPACE),
        &["reason"],
    )
    .expect("Failed to create AUTH_FAILURES_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("Failed to register DB_POOL_CONNECTIONS");
    registry
        .register(Box::new(APPLICATIONS_SUBMITTED_TOTAL.clone()))
        .expect("Failed to register APPLICATIONS_SUBMITTED_TOTAL");
    registry
        .register(Box::new(DUPLICATE_APPLICATIONS_TOTAL.clone()))
        .expect("Failed to register DUPLICATE_APPLICATIONS_TOTAL");
    registry
        .register(Box::new(ORDERS_CREATED_TOTAL.clone()))
        .expect("Failed to register ORDERS_CREATED_TOTAL");
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .expect("Failed to register AUTH_FAILURES_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32, max: u32) {
    DB_POOL_CONNECTIONS
        .with_label_values(&["idle"])
        .set(idle as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["active"])
        .set(active as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["max"])
        .set(max as f64);
}

pub fn record_application_submitted() {
    APPLICATIONS_SUBMITTED_TOTAL.inc();
}

pub fn record_duplicate_application() {
    DUPLICATE_APPLICATIONS_TOTAL.inc();
}

pub fn record_order_created() {
    ORDERS_CREATED_TOTAL.inc();
}

pub fn record_auth_failure(reason: &str) {
    AUTH_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gathered_output_contains_domain_counters() {
        // Touch the registry so every metric is registered.
        Lazy::force(&REGISTRY);
        record_application_submitted();
        record_auth_failure("token_expired");

        let output = gather_metrics();
        assert!(output.contains("recruit_sales_applications_submitted_total"));
        assert!(output.contains("reason=\"token_expired\""));
    }

    #[test]
    fn http_metrics_are_labelled_by_route() {
        Lazy::force(&REGISTRY);
        record_http_request("GET", "/api/jobs/", 200, 0.01);

        let output = gather_metrics();
        assert!(output.contains("path=\"/api/jobs/\""));
    }
}
