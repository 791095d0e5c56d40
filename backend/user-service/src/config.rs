/// Configuration for user-service
///
/// Loaded from a JSON file (see `portal_common::config`). Addresses and
/// subnets are kept as text in the file and parsed once by `Config::networks`.
use ipnet::IpNet;
use portal_common::config::{self as loader, parse_listen_addr, parse_subnet, ConfigError};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use validator::Validate;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Clone, Deserialize, Validate)]
pub struct Config {
    /// Public REST listener, e.g. `:8081`
    #[serde(default)]
    #[validate(length(min = 1, message = "rest_address"))]
    pub rest_address: String,

    /// gRPC listener, e.g. `:9090`
    #[serde(default)]
    #[validate(length(min = 1, message = "grpc_port"))]
    pub grpc_port: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "db_dsn"))]
    pub db_dsn: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "s3_address"))]
    pub s3_address: String,

    #[serde(rename = "s3_keyID", default)]
    #[validate(length(min = 1, message = "s3_keyID"))]
    pub s3_key_id: String,

    #[serde(rename = "s3_secretKey", default)]
    #[validate(length(min = 1, message = "s3_secretKey"))]
    pub s3_secret_key: String,

    #[serde(default)]
    pub s3_region: Option<String>,

    /// CIDR allowed to call the gRPC directory
    #[serde(default)]
    #[validate(length(min = 1, message = "trust_subnet"))]
    pub trust_subnet: String,

    #[serde(default)]
    pub cors_allowed: Vec<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "secret_key"))]
    pub secret_key: String,

    /// Admin REST listener
    #[serde(default)]
    #[validate(length(min = 1, message = "admin_address"))]
    pub admin_address: String,

    /// CIDR allowed to reach the admin REST listener
    #[serde(default)]
    #[validate(length(min = 1, message = "admin_trust_subnet"))]
    pub admin_trust_subnet: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rest_address", &self.rest_address)
            .field("grpc_port", &self.grpc_port)
            .field("log_level", &self.log_level)
            .field("db_dsn", &"[REDACTED]")
            .field("s3_address", &self.s3_address)
            .field("s3_key_id", &self.s3_key_id)
            .field("s3_secret_key", &"[REDACTED]")
            .field("trust_subnet", &self.trust_subnet)
            .field("cors_allowed", &self.cors_allowed)
            .field("secret_key", &"[REDACTED]")
            .field("admin_address", &self.admin_address)
            .field("admin_trust_subnet", &self.admin_trust_subnet)
            .finish()
    }
}

/// Parsed listener addresses and trust boundaries
#[derive(Debug, Clone, Copy)]
pub struct Networks {
    pub rest: SocketAddr,
    pub grpc: SocketAddr,
    pub admin: SocketAddr,
    pub trust_subnet: IpNet,
    pub admin_trust_subnet: IpNet,
}

impl Config {
    /// Load from `CONFIG_PATH` or `-c <path>`, then check that every
    /// address and subnet parses.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Config = loader::load_from_env_or_args()?;
        config.networks()?;
        Ok(config)
    }

    pub fn networks(&self) -> Result<Networks, ConfigError> {
        Ok(Networks {
            rest: parse_listen_addr("rest_address", &self.rest_address)?,
            grpc: parse_listen_addr("grpc_port", &self.grpc_port)?,
            admin: parse_listen_addr("admin_address", &self.admin_address)?,
            trust_subnet: parse_subnet("trust_subnet", &self.trust_subnet)?,
            admin_trust_subnet: parse_subnet("admin_trust_subnet", &self.admin_trust_subnet)?,
        })
    }
}
