//! Prometheus collectors for the HTTP gateway.
//!
//! Collectors register themselves in the default registry on first use, so
//! both the server path and router-level tests share one set of collectors
//! without an explicit install step.

use once_cell::sync::Lazy;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter_vec, HistogramVec,
    IntCounterVec,
};
use std::time::Duration;

static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "orient_gateway_requests_total",
        "Total HTTP gateway requests",
        &["route", "result"]
    )
    .expect("register_int_counter_vec")
});

static REQUEST_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "orient_gateway_request_duration_seconds",
        "Latency of HTTP gateway requests (seconds)",
        &["route", "result"],
        exponential_buckets(0.001, 2.0, 15).expect("buckets")
    )
    .expect("register_histogram_vec")
});

static PREDICTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "orient_predictions_total",
        "Predictions served, by decoded label",
        &["label"]
    )
    .expect("register_int_counter_vec")
});

/// Records one finished request for the `{route, result}` pair.
pub fn observe_request(route: &str, result: &str, elapsed: Duration) {
    REQUESTS_TOTAL.with_label_values(&[route, result]).inc();
    REQUEST_LATENCY
        .with_label_values(&[route, result])
        .observe(elapsed.as_secs_f64());
}

/// Counts one served prediction under its decoded label. Label cardinality is
/// bounded by the encoder's class list.
pub fn observe_prediction(label: &str) {
    PREDICTIONS_TOTAL.with_label_values(&[label]).inc();
}
