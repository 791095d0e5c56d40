//! Process-level helpers shared by the service binaries: log subscriber
//! setup and the shutdown signal.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter: `RUST_LOG` if set and valid, else `log_level`, else `info`.
pub fn log_filter(rust_log: Option<&str>, log_level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the JSON log subscriber for the process.
pub fn init_tracing(log_level: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref(), log_level))
        .with(tracing_subscriber::fmt::layer().json().with_target(false))
        .init();
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C signal"),
                    _ = terminate.recv() => info!("Received SIGTERM signal"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_wins_over_config() {
        let filter = log_filter(Some("warn"), "debug");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn config_level_used_without_rust_log() {
        assert_eq!(log_filter(None, "debug").to_string(), "debug");
    }

    #[test]
    fn invalid_levels_fall_back_to_info() {
        let filter = log_filter(Some("portal=verbose"), "portal=loud");
        assert_eq!(filter.to_string(), "info");
    }
}
