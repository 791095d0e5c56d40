/// News Service Main Entry Point
///
/// Runs the REST server and the file cleanup worker on one runtime. The
/// first task to fail stops the other; on shutdown the worker makes a last
/// cleanup pass within the grace period.
use actix_middleware::{build_cors, RequestTimeout, DEFAULT_REQUEST_TIMEOUT};
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use crypto_core::TokenSigner;
use db_pool::{create_pool, DbConfig};
use grpc_clients::{GrpcConfig, UserClient};
use news_service::models::{CONTENT_BUCKET, PREVIEW_BUCKET};
use news_service::{handlers, jobs, Config, NewsService, UserDirectory};
use portal_common::{init_tracing, shutdown_signal};
use s3_utils::{ObjectStore, S3Client, S3Config};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Grace period for in-flight requests and the final cleanup pass
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    info!("Starting news-service v{}", env!("CARGO_PKG_VERSION"));
    let rest_addr = config.rest_addr().context("Invalid rest_address")?;
    let real_ip = config.outbound_ip().context("Invalid real_ip")?;

    // Database
    let db_cfg = DbConfig::for_service("news-service", config.db_dsn.clone());
    db_cfg.log_config();
    let db_pool = create_pool(db_cfg)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    // Object storage
    let s3 = S3Client::new(
        S3Config::new(
            config.s3_address.clone(),
            config.s3_key_id.clone(),
            config.s3_secret_key.clone(),
            config.s3_region.clone(),
        ),
        "news-service",
    )
    .await;
    s3.ping().await.context("S3 endpoint is not reachable")?;
    for bucket in [CONTENT_BUCKET, PREVIEW_BUCKET] {
        s3.ensure_bucket(bucket)
            .await
            .with_context(|| format!("Failed to prepare bucket {}", bucket))?;
    }
    info!("S3 connection validated");
    let store: Arc<dyn ObjectStore> = Arc::new(s3);

    // User directory; connects on first use
    let grpc_config = GrpcConfig::for_user_service(config.user_service_address.clone());
    let users: Arc<dyn UserDirectory> = Arc::new(
        UserClient::connect_lazy(&grpc_config, real_ip)
            .context("Failed to create user-service client")?,
    );

    let service = NewsService::new(db_pool.clone(), store.clone(), users);
    let signer = Arc::new(TokenSigner::new(config.secret_key.as_bytes()));
    let cors_allowed = config.cors_allowed.clone();

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let mut tasks: JoinSet<io::Result<()>> = JoinSet::new();

    info!(%rest_addr, "Starting REST listener");
    let server = HttpServer::new(move || {
        let signer = signer.clone();
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(RequestTimeout::new(DEFAULT_REQUEST_TIMEOUT))
            .wrap(build_cors(&cors_allowed))
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| handlers::configure(cfg, signer))
    })
    .bind(rest_addr)
    .with_context(|| format!("Failed to bind REST listener on {}", rest_addr))?
    .shutdown_timeout(SHUTDOWN_TIMEOUT.as_secs())
    .run();
    let server_handle = server.handle();
    tasks.spawn(server);

    let cleaner_shutdown = shutdown_tx.subscribe();
    let cleaner_pool = db_pool.clone();
    tasks.spawn(async move {
        jobs::start_file_cleaner(cleaner_pool, store, cleaner_shutdown).await;
        Ok(())
    });

    let mut first_error: Option<io::Error> = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tokio::select! {
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => warn!("A task stopped unexpectedly"),
                Some(Ok(Err(e))) => {
                    error!(error = %e, "REST server failed");
                    first_error = Some(e);
                }
                Some(Err(e)) => {
                    error!(error = %e, "Task panicked");
                    first_error = Some(io::Error::new(io::ErrorKind::Other, e.to_string()));
                }
                None => {}
            }
        }
        _ = &mut shutdown => info!("Shutdown signal received"),
    }

    let _ = shutdown_tx.send(());
    let drain = async {
        server_handle.stop(true).await;
        while tasks.join_next().await.is_some() {}
    };
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, drain).await.is_err() {
        warn!("Tasks did not stop within the grace period; aborting");
        tasks.shutdown().await;
    }

    db_pool.close().await;
    info!("News-service shutdown complete");

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
