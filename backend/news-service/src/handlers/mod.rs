/// HTTP handlers and route table for news-service
///
/// Everything under `/api` requires a session cookie; the `/api/news/writer`
/// scope additionally requires the writer role.
pub mod activities;
pub mod multipart;
pub mod news;

use crate::metrics;
use actix_middleware::{
    json_config, path_config, query_config, AuthenticatedProfile, CookieAuth, RequireRole,
};
use actix_web::{web, HttpResponse};
use crypto_core::TokenSigner;
use portal_common::WRITER_ROLE;
use std::sync::Arc;

async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "news-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Profile of the caller, straight from the session token
async fn me(profile: AuthenticatedProfile) -> HttpResponse {
    HttpResponse::Ok().json(profile.into_inner())
}

pub fn configure(cfg: &mut web::ServiceConfig, signer: Arc<TokenSigner>) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route("/health", web::get().to(liveness))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .service(
            web::scope("/api")
                .wrap(CookieAuth::new(signer))
                .route("/profile/me", web::get().to(me))
                .service(
                    web::scope("/news")
                        .route("/newsList", web::get().to(news::get_news_list))
                        .service(
                            web::scope("/writer")
                                .wrap(RequireRole::new(WRITER_ROLE))
                                .route("/create", web::post().to(news::create_news))
                                .service(
                                    web::resource("/{id}")
                                        .route(web::patch().to(news::edit_news))
                                        .route(web::delete().to(news::delete_news)),
                                ),
                        )
                        .route("/files/{id}", web::get().to(news::download_file))
                        .route("/{id}", web::get().to(news::get_news))
                        .route("/{id}/likes", web::get().to(activities::get_likes))
                        .route("/{id}/likes/like", web::patch().to(activities::like))
                        .route("/{id}/likes/dislike", web::patch().to(activities::dislike))
                        .service(
                            web::resource("/{id}/comment")
                                .route(web::get().to(activities::get_comments))
                                .route(web::post().to(activities::create_comment))
                                .route(web::patch().to(activities::edit_comment)),
                        )
                        .route(
                            "/{id}/comment/{comment_id}",
                            web::delete().to(activities::delete_comment),
                        ),
                ),
        );
}
