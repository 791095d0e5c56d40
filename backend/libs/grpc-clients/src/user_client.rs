//! User directory client
//!
//! Batch profile lookups against user-service's `GetUserByIDs`. Every call
//! carries the caller's address in `x-real-ip`, which the server checks
//! against its trusted subnet.

use crate::config::GrpcConfig;
use crate::user::{user_client::UserClient as TonicUserClient, UserByIDsRequest, Users};
use anyhow::{Context, Result};
use portal_common::Profile;
use std::net::IpAddr;
use std::time::Duration;
use tonic::metadata::AsciiMetadataValue;
use tonic::transport::Channel;
use uuid::Uuid;

pub const REAL_IP_HEADER: &str = "x-real-ip";

#[derive(Clone)]
pub struct UserClient {
    client: TonicUserClient<Channel>,
    real_ip: AsciiMetadataValue,
    request_timeout: Duration,
}

impl UserClient {
    /// Create from Channel directly (typically created with connect_lazy()).
    pub fn new(channel: Channel, real_ip: IpAddr, request_timeout: Duration) -> Result<Self> {
        let real_ip = real_ip
            .to_string()
            .parse::<AsciiMetadataValue>()
            .context("Invalid x-real-ip value")?;

        Ok(Self {
            client: TonicUserClient::new(channel),
            real_ip,
            request_timeout,
        })
    }

    /// Lazily connected client built from config
    pub fn connect_lazy(config: &GrpcConfig, real_ip: IpAddr) -> Result<Self> {
        tracing::info!(
            url = %config.user_service_uri(),
            real_ip = %real_ip,
            "Creating user service gRPC client"
        );

        let channel = config
            .connect_lazy()
            .context("Failed to build user-service endpoint")?;
        Self::new(channel, real_ip, config.request_timeout())
    }

    /// Get profiles by multiple IDs (batch operation)
    ///
    /// Unknown ids are simply absent from the result. An empty input makes
    /// no call at all.
    pub async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut client = self.client.clone();
        let request = UserByIDsRequest {
            userids: user_ids.iter().map(|id| id.to_string()).collect(),
        };

        let mut tonic_request = tonic::Request::new(request);
        tonic_request.set_timeout(self.request_timeout);
        tonic_request
            .metadata_mut()
            .insert(REAL_IP_HEADER, self.real_ip.clone());

        let response = client
            .get_user_by_i_ds(tonic_request)
            .await
            .context("Failed to batch fetch users via user-service")?;

        Ok(response
            .into_inner()
            .users
            .into_iter()
            .filter_map(profile_from_proto)
            .collect())
    }
}

/// Convert a wire user into a `Profile`; entries with an unparsable id are dropped.
pub fn profile_from_proto(user: Users) -> Option<Profile> {
    let id = match Uuid::parse_str(&user.user_id) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(user_id = %user.user_id, "Invalid UUID from user-service");
            return None;
        }
    };

    Some(Profile {
        id,
        username: user.username,
        first_name: user.firstname,
        last_name: user.lastname,
        sur_name: user.surname,
        avatar_id: Uuid::parse_str(&user.avatar).ok(),
        roles: user.roles,
    })
}
