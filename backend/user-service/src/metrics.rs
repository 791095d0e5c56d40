//! Prometheus metrics for user-service.
//!
//! Exposes auth and directory counters and an HTTP handler for `/metrics`.

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

/// Signup/signin attempts by outcome
static AUTH_ATTEMPTS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_auth_attempts_total",
        "Signup and signin attempts by outcome",
        &["op", "result"]
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register user_auth_attempts_total"))
    .ok()
});

/// GetUserByIDs calls by outcome
static GRPC_REQUESTS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_grpc_requests_total",
        "GetUserByIDs requests by outcome",
        &["result"]
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register user_grpc_requests_total"))
    .ok()
});

pub fn record_auth_attempt(op: &str, success: bool) {
    if let Some(counter) = AUTH_ATTEMPTS_TOTAL.as_ref() {
        let result = if success { "success" } else { "failure" };
        counter.with_label_values(&[op, result]).inc();
    }
}

pub fn record_grpc_request(result: &str) {
    if let Some(counter) = GRPC_REQUESTS_TOTAL.as_ref() {
        counter.with_label_values(&[result]).inc();
    }
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
