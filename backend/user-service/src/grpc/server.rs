/// gRPC server implementation for user-service
///
/// Serves `user.User/GetUserByIDs` to peer services inside the trusted subnet.
use super::interceptor::SubnetInterceptor;
use crate::metrics;
use crate::services::UserService;
use ipnet::IpNet;
use portal_common::Profile;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::broadcast;
use tonic::{Request, Response, Status};
use uuid::Uuid;

pub mod proto {
    tonic::include_proto!("user");
}

use proto::user_server::{User, UserServer};
use proto::{UserByIDsRequest, UserByIDsResponse, Users};

/// Deadline for a single gRPC call
pub const GRPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct UserDirectoryServer {
    service: UserService,
}

impl UserDirectoryServer {
    pub fn new(service: UserService) -> Self {
        Self { service }
    }
}

/// Parse every id or fail on the first bad one
fn parse_user_ids(raw: &[String]) -> Result<Vec<Uuid>, Status> {
    raw.iter()
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|_| Status::invalid_argument(format!("{} can't parse userID", id)))
        })
        .collect()
}

fn profile_to_proto(profile: Profile) -> Users {
    Users {
        user_id: profile.id.to_string(),
        username: profile.username,
        firstname: profile.first_name,
        lastname: profile.last_name,
        surname: profile.sur_name,
        avatar: profile.avatar_id.map(|id| id.to_string()).unwrap_or_default(),
        roles: profile.roles,
    }
}

#[tonic::async_trait]
impl User for UserDirectoryServer {
    async fn get_user_by_i_ds(
        &self,
        request: Request<UserByIDsRequest>,
    ) -> Result<Response<UserByIDsResponse>, Status> {
        let req = request.into_inner();

        let ids = parse_user_ids(&req.userids).inspect_err(|_| {
            metrics::record_grpc_request("invalid_argument");
        })?;

        let profiles = self.service.get_users_by_ids(&ids).await.map_err(|e| {
            tracing::error!(error = %e, requested = ids.len(), "GetUserByIDs failed");
            metrics::record_grpc_request("error");
            Status::internal("can't get users")
        })?;

        metrics::record_grpc_request("success");
        tracing::debug!(requested = ids.len(), found = profiles.len(), "GetUserByIDs");

        Ok(Response::new(UserByIDsResponse {
            users: profiles.into_iter().map(profile_to_proto).collect(),
        }))
    }
}

/// Run the gRPC listener until `shutdown` fires
pub async fn start_grpc_server(
    addr: SocketAddr,
    service: UserService,
    trust_subnet: IpNet,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), tonic::transport::Error> {
    use tonic::transport::Server;

    tracing::info!("Starting gRPC server at {}", addr);

    let directory = UserDirectoryServer::new(service);

    Server::builder()
        .timeout(GRPC_REQUEST_TIMEOUT)
        .add_service(UserServer::with_interceptor(
            directory,
            SubnetInterceptor::new(trust_subnet),
        ))
        .serve_with_shutdown(addr, async move {
            // Wait for shutdown notification; ignore errors if sender dropped.
            let _ = shutdown.recv().await;
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_ids_reports_bad_id() {
        let good = Uuid::new_v4().to_string();
        let err = parse_user_ids(&[good, "nope".to_string()]).unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
        assert_eq!(err.message(), "nope can't parse userID");
    }

    #[test]
    fn test_profile_to_proto() {
        let id = Uuid::new_v4();
        let wire = profile_to_proto(Profile {
            id,
            username: "jdoe".into(),
            sur_name: "Q".into(),
            roles: vec!["reader".into()],
            ..Default::default()
        });
        assert_eq!(wire.user_id, id.to_string());
        assert_eq!(wire.surname, "Q");
        assert_eq!(wire.avatar, "");
        assert_eq!(wire.roles, vec!["reader"]);
    }
}
