//! Trusted-subnet gate for internal-only listeners.
//!
//! The peer address of the TCP connection decides admission; forwarding
//! headers are ignored. A request whose peer address is unknown is rejected.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ready, Ready};
use ipnet::IpNet;
use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::rc::Rc;

use crate::error::GateError;

/// True when `addr` is inside `subnet`.
///
/// IPv4-mapped IPv6 peers (`::ffff:a.b.c.d`) are compared as IPv4.
pub fn peer_in_subnet(subnet: &IpNet, addr: IpAddr) -> bool {
    let addr = match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(addr),
        v4 => v4,
    };
    subnet.contains(&addr)
}

pub struct SubnetGate {
    subnet: IpNet,
}

impl SubnetGate {
    pub fn new(subnet: IpNet) -> Self {
        Self { subnet }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SubnetGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SubnetGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SubnetGateService {
            service: Rc::new(service),
            subnet: self.subnet,
        }))
    }
}

pub struct SubnetGateService<S> {
    service: Rc<S>,
    subnet: IpNet,
}

impl<S, B> Service<ServiceRequest> for SubnetGateService<S>
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
        let peer = req.peer_addr().map(|a| a.ip());
        let admitted = peer.is_some_and(|ip| peer_in_subnet(&self.subnet, ip));

        if !admitted {
            tracing::warn!(
                peer = ?peer,
                subnet = %self.subnet,
                path = %req.path(),
                "Request from outside trusted subnet"
            );
            return Box::pin(ready(Err(GateError::OutsideSubnet.into())));
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use std::net::SocketAddr;

    fn subnet() -> IpNet {
        "10.0.0.0/8".parse().unwrap()
    }

    #[::core::prelude::v1::test]
    fn test_peer_in_subnet() {
        assert!(peer_in_subnet(&subnet(), "10.1.2.3".parse().unwrap()));
        assert!(!peer_in_subnet(&subnet(), "192.168.1.1".parse().unwrap()));
        assert!(peer_in_subnet(&subnet(), "::ffff:10.9.9.9".parse().unwrap()));
        assert!(!peer_in_subnet(&subnet(), "::1".parse().unwrap()));
    }

    #[actix_web::test]
    async fn test_inside_subnet_admitted() {
        let app = test::init_service(
            App::new()
                .wrap(SubnetGate::new(subnet()))
                .route("/api/user", web::post().to(|| async { HttpResponse::Created().finish() })),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/user")
            .peer_addr("10.0.0.5:40000".parse::<SocketAddr>().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_outside_subnet_rejected_regardless_of_headers() {
        let app = test::init_service(
            App::new()
                .wrap(SubnetGate::new(subnet()))
                .route("/api/user", web::post().to(|| async { HttpResponse::Created().finish() })),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/user")
            .insert_header(("X-Real-IP", "10.0.0.5"))
            .peer_addr("172.16.0.5:40000".parse::<SocketAddr>().unwrap())
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "not available on this subnet");
    }

    #[actix_web::test]
    async fn test_unknown_peer_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(SubnetGate::new(subnet()))
                .route("/api/user", web::post().to(|| async { HttpResponse::Created().finish() })),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/user").to_request();
        assert!(test::try_call_service(&app, req).await.is_err());
    }
}
