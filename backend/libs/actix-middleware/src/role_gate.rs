use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::cookie_auth::AuthenticatedProfile;
use crate::error::GateError;

/// Admits only callers whose profile holds `role`.
///
/// Must run inside `CookieAuth`; a request with no profile in its
/// extensions is treated as not allowed.
pub struct RequireRole {
    role: Rc<str>,
}

impl RequireRole {
    pub fn new(role: &str) -> Self {
        Self { role: Rc::from(role) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service: Rc::new(service),
            role: self.role.clone(),
        }))
    }
}

pub struct RequireRoleService<S> {
    service: Rc<S>,
    role: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allowed = req
            .extensions()
            .get::<AuthenticatedProfile>()
            .is_some_and(|p| p.0.has_role(&self.role));

        if !allowed {
            tracing::debug!(role = %self.role, path = %req.path(), "Role check failed");
            return Box::pin(ready(Err(GateError::NotAllowed.into())));
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie_auth::{CookieAuth, AUTH_COOKIE};
    use actix_web::{cookie::Cookie, http::StatusCode, test, web, App, HttpResponse};
    use crypto_core::TokenSigner;
    use portal_common::Profile;
    use std::sync::Arc;

    const SECRET: &[u8] = b"role-gate-secret";

    fn token_with_roles(roles: &[&str]) -> String {
        let profile = Profile {
            id: uuid::Uuid::new_v4(),
            username: "someone".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        };
        TokenSigner::new(SECRET).sign(&profile).unwrap()
    }

    macro_rules! writer_app {
        () => {
            test::init_service(
                App::new().service(
                    web::scope("/writer")
                        .wrap(RequireRole::new("writer"))
                        .wrap(CookieAuth::new(Arc::new(TokenSigner::new(SECRET))))
                        .route("/create", web::post().to(|| async { HttpResponse::Created().finish() })),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_writer_admitted() {
        let app = writer_app!();
        let req = test::TestRequest::post()
            .uri("/writer/create")
            .cookie(Cookie::new(AUTH_COOKIE, token_with_roles(&["reader", "writer"])))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_reader_forbidden() {
        let app = writer_app!();
        let req = test::TestRequest::post()
            .uri("/writer/create")
            .cookie(Cookie::new(AUTH_COOKIE, token_with_roles(&["reader"])))
            .to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "not allowed");
    }

    #[actix_web::test]
    async fn test_without_profile_forbidden() {
        let app = test::init_service(
            App::new()
                .wrap(RequireRole::new("writer"))
                .route("/x", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get().uri("/x").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
    }
}
