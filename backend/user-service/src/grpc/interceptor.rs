/// Trusted-subnet check for incoming gRPC calls
///
/// The caller's address comes from the `x-real-ip` metadata entry. The value
/// is trusted as sent, so the gRPC port must not be reachable from outside
/// the trust boundary.
use actix_middleware::peer_in_subnet;
use ipnet::IpNet;
use std::net::IpAddr;
use tonic::{service::Interceptor, Request, Status};

pub const REAL_IP_HEADER: &str = "x-real-ip";

#[derive(Debug, Clone, Copy)]
pub struct SubnetInterceptor {
    subnet: IpNet,
}

impl SubnetInterceptor {
    pub fn new(subnet: IpNet) -> Self {
        Self { subnet }
    }
}

impl Interceptor for SubnetInterceptor {
    fn call(&mut self, req: Request<()>) -> Result<Request<()>, Status> {
        let caller = req
            .metadata()
            .get(REAL_IP_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        match caller {
            Some(ip) if peer_in_subnet(&self.subnet, ip) => Ok(req),
            other => {
                tracing::warn!(caller = ?other, "gRPC call rejected outside trusted subnet");
                Err(Status::unavailable("not available on this subnet"))
            }
        }
    }
}
