//! Prometheus metrics for database connection pool

use once_cell::sync::Lazy;
use prometheus::{register_int_gauge_vec, IntGaugeVec};
use sqlx::PgPool;

/// Database connection pool size by state (idle/active/max)
static DB_POOL_CONNECTIONS: Lazy<Option<IntGaugeVec>> = Lazy::new(|| {
    register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    )
    .map_err(|e| tracing::warn!(error = %e, "Failed to register db pool metrics"))
    .ok()
});

/// Update connection pool metrics (called periodically)
pub(crate) fn update_pool_metrics(pool: &PgPool, service: &str) {
    let Some(gauge) = DB_POOL_CONNECTIONS.as_ref() else {
        return;
    };

    let size = pool.size() as i64;
    let idle = pool.num_idle() as i64;

    gauge.with_label_values(&[service, "idle"]).set(idle);
    gauge.with_label_values(&[service, "active"]).set(size - idle);
    gauge
        .with_label_values(&[service, "max"])
        .set(pool.options().get_max_connections() as i64);
}
