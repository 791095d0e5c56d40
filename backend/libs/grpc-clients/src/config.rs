/// gRPC Configuration
///
/// Endpoint settings for the user directory client.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrpcConfig {
    /// User Service endpoint, `host:port` or full URL
    pub user_service_url: String,

    /// gRPC connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// gRPC request timeout in seconds
    pub request_timeout_secs: u64,

    /// HTTP/2 keep-alive interval in seconds
    pub keepalive_interval_secs: u64,

    /// HTTP/2 keep-alive timeout in seconds
    pub keepalive_timeout_secs: u64,
}

impl GrpcConfig {
    /// Defaults used by news-service for a given user-service address
    pub fn for_user_service(address: impl Into<String>) -> Self {
        Self {
            user_service_url: address.into(),
            connection_timeout_secs: 5,
            request_timeout_secs: 5,
            keepalive_interval_secs: 30,
            keepalive_timeout_secs: 10,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Address with a scheme; bare `host:port` is plain HTTP/2
    pub fn user_service_uri(&self) -> String {
        let url = self.user_service_url.trim();
        if url.contains("://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }

    /// Build a tonic Endpoint from URL with timeouts/keepalive
    pub fn make_endpoint(&self, url: &str) -> Result<Endpoint, tonic::transport::Error> {
        Ok(Endpoint::from_shared(url.to_string())?
            .connect_timeout(Duration::from_secs(self.connection_timeout_secs))
            .timeout(self.request_timeout())
            .http2_keep_alive_interval(Duration::from_secs(self.keepalive_interval_secs))
            .keep_alive_timeout(Duration::from_secs(self.keepalive_timeout_secs))
            .tcp_nodelay(true))
    }

    /// Lazily connected channel; the first call establishes the connection.
    ///
    /// Lets news-service start before user-service is reachable.
    pub fn connect_lazy(&self) -> Result<Channel, tonic::transport::Error> {
        Ok(self.make_endpoint(&self.user_service_uri())?.connect_lazy())
    }
}
