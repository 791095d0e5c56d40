//! Prometheus metrics for news-service
//!
//! User lookup counters live here; cleanup worker metrics in `file_cleaner`.

pub mod file_cleaner;

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

/// GetUserByIDs calls made for enrichment, by outcome
static USER_LOOKUPS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    register_int_counter_vec!(
        "news_user_lookups_total",
        "User directory lookups made to enrich responses",
        &["result"]
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register news_user_lookups_total"))
    .ok()
});

pub fn record_user_lookup(result: &str) {
    if let Some(counter) = USER_LOOKUPS_TOTAL.as_ref() {
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
