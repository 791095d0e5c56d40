//! Extractor configuration shared by the portal services
//!
//! Malformed JSON bodies, path segments and query strings are answered with
//! the same `{"msg": "..."}` body as every other rejection.

use actix_web::{error::InternalError, web, HttpResponse};
use portal_common::ErrorResponse;

fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let body = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
    InternalError::from_response(err, body).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| bad_request(err))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| bad_request(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[allow(dead_code)]
        login: String,
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_msg_body() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/", web::post().to(|_: web::Json<Body>| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["msg"].is_string());
    }

    #[actix_web::test]
    async fn test_bad_path_segment_gets_msg_body() {
        let app = test::init_service(
            App::new().app_data(path_config()).route(
                "/{id}",
                web::get().to(|_: web::Path<uuid::Uuid>| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/not-a-uuid").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
