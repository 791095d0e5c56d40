/// HTTP handlers and route tables for the public and admin listeners
pub mod admin;
pub mod public;

use crate::metrics;
use actix_middleware::{json_config, path_config, CookieAuth};
use actix_web::{web, HttpResponse};
use crypto_core::TokenSigner;
use std::sync::Arc;

async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "user-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Routes of the public listener
pub fn configure_public(cfg: &mut web::ServiceConfig, signer: Arc<TokenSigner>) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/health", web::get().to(liveness))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/user")
                        .route("/signup", web::post().to(public::sign_up))
                        .route("/signin", web::post().to(public::sign_in)),
                )
                .service(
                    web::scope("/health")
                        .wrap(CookieAuth::new(signer))
                        .route("/check", web::get().to(public::health_check)),
                ),
        );
}

/// Routes of the admin listener; the caller wraps the app in `SubnetGate`
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::resource("/api/user")
            .route(web::post().to(admin::create_user))
            .route(web::patch().to(admin::edit_user))
            .route(web::delete().to(admin::delete_users)),
    );
}
