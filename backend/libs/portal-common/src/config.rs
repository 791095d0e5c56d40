//! Configuration file loading shared by the portal binaries
//!
//! Each service reads one JSON document. Its location comes from the
//! `CONFIG_PATH` environment variable, or from `-c <path>` on the command
//! line when the variable is unset. Missing required keys are reported by
//! their JSON names.

use clap::Parser;
use ipnet::IpNet;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("empty config path: set {CONFIG_PATH_ENV} or pass -c <path>")]
    MissingPath,

    #[error("can't read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: config::ConfigError,
    },

    #[error("required config attributes is empty: {0}")]
    MissingKeys(String),

    #[error("invalid subnet in {key}: {value}")]
    InvalidSubnet { key: &'static str, value: String },

    #[error("invalid address in {key}: {value}")]
    InvalidAddress { key: &'static str, value: String },
}

/// Command line of the portal binaries
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ConfigArgs {
    /// Path to the JSON config file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Pick the config file: `CONFIG_PATH` wins over the `-c` flag.
pub fn resolve_config_path(
    env_path: Option<String>,
    flag_path: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    env_path
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .or(flag_path)
        .ok_or(ConfigError::MissingPath)
}

/// Resolve the path from the process environment and arguments, then load it.
pub fn load_from_env_or_args<T>() -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate,
{
    if cfg!(debug_assertions) {
        dotenvy::dotenv().ok();
    }

    let args = ConfigArgs::parse();
    let path = resolve_config_path(std::env::var(CONFIG_PATH_ENV).ok(), args.config)?;
    load_file(&path)
}

/// Deserialize and validate a JSON config file.
pub fn load_file<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate,
{
    let read_err = |source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    };

    let parsed: T = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Json))
        .build()
        .map_err(read_err)?
        .try_deserialize()
        .map_err(read_err)?;

    parsed.validate().map_err(missing_keys)?;
    Ok(parsed)
}

/// Collapse validation failures into one error naming the offending keys.
///
/// Field validators carry the JSON key as their message.
pub fn missing_keys(errors: ValidationErrors) -> ConfigError {
    let mut keys: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| field.to_string())
            })
        })
        .collect();
    keys.sort();
    keys.dedup();
    ConfigError::MissingKeys(keys.join(", "))
}

pub fn parse_subnet(key: &'static str, value: &str) -> Result<IpNet, ConfigError> {
    value
        .trim()
        .parse::<IpNet>()
        .map_err(|_| ConfigError::InvalidSubnet {
            key,
            value: value.to_string(),
        })
}

/// Parse a listen address. A bare `:port` binds every interface.
pub fn parse_listen_addr(key: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    let value = value.trim();
    let full = if value.starts_with(':') {
        format!("0.0.0.0{}", value)
    } else {
        value.to_string()
    };
    full.parse::<SocketAddr>()
        .map_err(|_| ConfigError::InvalidAddress {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[serde(default)]
        #[validate(length(min = 1, message = "rest_address"))]
        rest_address: String,
        #[serde(rename = "s3_keyID", default)]
        #[validate(length(min = 1, message = "s3_keyID"))]
        s3_key_id: String,
        #[serde(default)]
        cors_allowed: Vec<String>,
    }

    fn write_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("portal-config-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn env_path_wins_over_flag() {
        let path = resolve_config_path(
            Some("/etc/portal/env.json".into()),
            Some(PathBuf::from("/etc/portal/flag.json")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/etc/portal/env.json"));
    }

    #[test]
    fn flag_used_without_env() {
        let path = resolve_config_path(None, Some(PathBuf::from("flag.json"))).unwrap();
        assert_eq!(path, PathBuf::from("flag.json"));
        assert!(matches!(
            resolve_config_path(Some(String::new()), None),
            Err(ConfigError::MissingPath)
        ));
    }

    #[test]
    fn loads_json_with_wire_key_names() {
        let path = write_config(
            r#"{"rest_address": ":8080", "s3_keyID": "minio", "cors_allowed": ["http://a"]}"#,
        );
        let cfg: Sample = load_file(&path).unwrap();
        assert_eq!(cfg.rest_address, ":8080");
        assert_eq!(cfg.s3_key_id, "minio");
        assert_eq!(cfg.cors_allowed, vec!["http://a"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_keys_are_named() {
        let path = write_config(r#"{"cors_allowed": []}"#);
        let err = load_file::<Sample>(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "required config attributes is empty: rest_address, s3_keyID"
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn subnet_parsing() {
        assert!(parse_subnet("trust_subnet", "10.0.0.0/8").is_ok());
        assert!(matches!(
            parse_subnet("trust_subnet", "not-a-cidr"),
            Err(ConfigError::InvalidSubnet { key: "trust_subnet", .. })
        ));
    }

    #[test]
    fn listen_addr_accepts_bare_port() {
        let addr = parse_listen_addr("rest_address", ":8080").unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
        let addr = parse_listen_addr("rest_address", "127.0.0.1:9090").unwrap();
        assert_eq!(addr.port(), 9090);
        assert!(parse_listen_addr("rest_address", "localhost").is_err());
    }
}
