use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use crypto_core::{TokenError, TokenSigner};
use futures::future::{ready, Ready};
use portal_common::Profile;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::GateError;

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE: &str = "authorization";

/// Profile decoded from the session cookie
#[derive(Debug, Clone)]
pub struct AuthenticatedProfile(pub Profile);

impl AuthenticatedProfile {
    pub fn into_inner(self) -> Profile {
        self.0
    }
}

/// Session cookie authentication middleware
pub struct CookieAuth {
    signer: Arc<TokenSigner>,
}

impl CookieAuth {
    pub fn new(signer: Arc<TokenSigner>) -> Self {
        Self { signer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CookieAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieAuthService {
            service: Rc::new(service),
            signer: self.signer.clone(),
        }))
    }
}

pub struct CookieAuthService<S> {
    service: Rc<S>,
    signer: Arc<TokenSigner>,
}

impl<S, B> Service<ServiceRequest> for CookieAuthService<S>
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
        let service = self.service.clone();
        let signer = self.signer.clone();

        Box::pin(async move {
            let token = req
                .cookie(AUTH_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(GateError::MissingCookie)?;

            let profile = signer.parse(&token).map_err(|e| match e {
                TokenError::Expired => GateError::TokenExpired,
                other => {
                    tracing::warn!(error = %other, "Session token rejected");
                    GateError::InvalidToken
                }
            })?;

            req.extensions_mut().insert(AuthenticatedProfile(profile));

            service.call(req).await
        })
    }
}

impl actix_web::FromRequest for AuthenticatedProfile {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<AuthenticatedProfile>() {
            Some(profile) => ready(Ok(profile.clone())),
            None => ready(Err(GateError::MissingCookie.into())),
        }
    }
}
