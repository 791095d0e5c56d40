/// User Service Main Entry Point
///
/// Runs three listeners on one runtime:
/// - Public REST (signup, signin, health check)
/// - Admin REST behind the admin trusted subnet
/// - gRPC `GetUserByIDs` behind the trusted subnet
///
/// The first listener to fail stops the others.
use actix_middleware::{build_cors, RequestTimeout, SubnetGate, DEFAULT_REQUEST_TIMEOUT};
use actix_web::{dev::ServerHandle, middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use crypto_core::TokenSigner;
use db_pool::{create_pool, DbConfig};
use ipnet::IpNet;
use portal_common::{init_tracing, shutdown_signal};
use s3_utils::{ObjectStore, S3Client, S3Config};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use user_service::{config::Networks, grpc, handlers, Config, UserService};

/// Grace period for in-flight requests on shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerKind {
    Public,
    Admin,
    Grpc,
}

impl ServerKind {
    fn name(self) -> &'static str {
        match self {
            ServerKind::Public => "public REST",
            ServerKind::Admin => "admin REST",
            ServerKind::Grpc => "gRPC",
        }
    }
}

/// Listener table: every server this binary runs, with its address
fn server_table(networks: &Networks) -> [(ServerKind, SocketAddr); 3] {
    [
        (ServerKind::Public, networks.rest),
        (ServerKind::Admin, networks.admin),
        (ServerKind::Grpc, networks.grpc),
    ]
}

/// Shared state handed to every listener
#[derive(Clone)]
struct AppState {
    service: UserService,
    signer: Arc<TokenSigner>,
    cors_allowed: Vec<String>,
    trust_subnet: IpNet,
    admin_trust_subnet: IpNet,
}

fn public_server(state: &AppState, addr: SocketAddr) -> io::Result<actix_web::dev::Server> {
    let state = state.clone();
    let server = HttpServer::new(move || {
        let signer = state.signer.clone();
        App::new()
            .app_data(web::Data::new(state.service.clone()))
            .app_data(web::Data::from(signer.clone()))
            .wrap(RequestTimeout::new(DEFAULT_REQUEST_TIMEOUT))
            .wrap(build_cors(&state.cors_allowed))
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| handlers::configure_public(cfg, signer))
    })
    .bind(addr)?
    .shutdown_timeout(SHUTDOWN_TIMEOUT.as_secs())
    .run();

    Ok(server)
}

fn admin_server(state: &AppState, addr: SocketAddr) -> io::Result<actix_web::dev::Server> {
    let state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.service.clone()))
            .wrap(RequestTimeout::new(DEFAULT_REQUEST_TIMEOUT))
            .wrap(SubnetGate::new(state.admin_trust_subnet))
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure_admin)
    })
    .bind(addr)?
    .workers(1)
    .shutdown_timeout(SHUTDOWN_TIMEOUT.as_secs())
    .run();

    Ok(server)
}

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    info!("Starting user-service v{}", env!("CARGO_PKG_VERSION"));
    let networks = config.networks().context("Invalid listener configuration")?;

    // Database
    let db_cfg = DbConfig::for_service("user-service", config.db_dsn.clone());
    db_cfg.log_config();
    let db_pool = create_pool(db_cfg)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    // Object storage liveness; avatars live there
    let s3 = S3Client::new(
        S3Config::new(
            config.s3_address.clone(),
            config.s3_key_id.clone(),
            config.s3_secret_key.clone(),
            config.s3_region.clone(),
        ),
        "user-service",
    )
    .await;
    s3.ping().await.context("S3 endpoint is not reachable")?;
    info!("S3 connection validated");

    let state = AppState {
        service: UserService::new(db_pool.clone()),
        signer: Arc::new(TokenSigner::new(config.secret_key.as_bytes())),
        cors_allowed: config.cors_allowed.clone(),
        trust_subnet: networks.trust_subnet,
        admin_trust_subnet: networks.admin_trust_subnet,
    };

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let mut tasks: JoinSet<io::Result<()>> = JoinSet::new();
    let mut http_handles: Vec<ServerHandle> = Vec::new();

    for (kind, addr) in server_table(&networks) {
        info!(server = kind.name(), %addr, "Starting listener");
        let http = match kind {
            ServerKind::Public => Some(public_server(&state, addr)),
            ServerKind::Admin => Some(admin_server(&state, addr)),
            ServerKind::Grpc => None,
        };

        match http {
            Some(server) => {
                let server = server
                    .with_context(|| format!("Failed to bind {} listener on {}", kind.name(), addr))?;
                http_handles.push(server.handle());
                tasks.spawn(server);
            }
            None => {
                let service = state.service.clone();
                let subnet = state.trust_subnet;
                let shutdown = shutdown_tx.subscribe();
                tasks.spawn(async move {
                    grpc::start_grpc_server(addr, service, subnet, shutdown)
                        .await
                        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
                });
            }
        }
    }

    let mut first_error: Option<io::Error> = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tokio::select! {
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => warn!("A listener stopped unexpectedly"),
                Some(Ok(Err(e))) => {
                    error!(error = %e, "Listener failed");
                    first_error = Some(e);
                }
                Some(Err(e)) => {
                    error!(error = %e, "Listener task panicked");
                    first_error = Some(io::Error::new(io::ErrorKind::Other, e.to_string()));
                }
                None => {}
            }
        }
        _ = &mut shutdown => info!("Shutdown signal received"),
    }

    let _ = shutdown_tx.send(());
    let drain = async {
        futures::future::join_all(http_handles.iter().map(|h| h.stop(true))).await;
        while tasks.join_next().await.is_some() {}
    };
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, drain).await.is_err() {
        warn!("Listeners did not stop within the grace period; aborting");
        tasks.shutdown().await;
    }

    db_pool.close().await;
    info!("User-service shutdown complete");

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
