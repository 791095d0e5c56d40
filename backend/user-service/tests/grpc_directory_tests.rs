//! GetUserByIDs over the wire
//!
//! The ignored tests start Postgres and a real gRPC listener.

mod common;

use portal_common::UserData;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::broadcast;
use tonic::Code;
use user_service::grpc::proto::{
    user_client::UserClient, user_server::User, UserByIDsRequest,
};
use user_service::grpc::{start_grpc_server, UserDirectoryServer, REAL_IP_HEADER};

fn request(ids: Vec<String>, real_ip: Option<&str>) -> tonic::Request<UserByIDsRequest> {
    let mut req = tonic::Request::new(UserByIDsRequest { userids: ids });
    if let Some(ip) = real_ip {
        req.metadata_mut()
            .insert(REAL_IP_HEADER, ip.parse().unwrap());
    }
    req
}

fn free_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn test_invalid_id_is_invalid_argument() {
    let server = UserDirectoryServer::new(common::offline_service());

    let status = server
        .get_user_by_i_ds(request(vec!["12345".into()], None))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "12345 can't parse userID");
}

#[tokio::test]
async fn test_storage_failure_is_internal() {
    let server = UserDirectoryServer::new(common::offline_service());

    let status = server
        .get_user_by_i_ds(request(vec![uuid::Uuid::new_v4().to_string()], None))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);
    assert_eq!(status.message(), "can't get users");
}

#[tokio::test]
#[ignore]
async fn test_lookup_through_subnet_gate() {
    let (_container, service) = common::start_service().await;
    let id = service
        .create_user(UserData {
            login: "grpc-user".into(),
            password: "pw".into(),
            profile: None,
        })
        .await
        .unwrap();

    let addr = free_port();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let server = tokio::spawn(start_grpc_server(
        addr,
        service,
        "127.0.0.0/8".parse().unwrap(),
        shutdown_rx,
    ));
    tokio::time::sleep(Duration::from_millis(200)).await;

    let mut client = UserClient::connect(format!("http://{}", addr)).await.unwrap();

    let resp = client
        .get_user_by_i_ds(request(vec![id.to_string()], Some("127.0.0.1")))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resp.users.len(), 1);
    assert_eq!(resp.users[0].username, "grpc-user");
    assert_eq!(resp.users[0].roles, vec!["reader"]);

    let status = client
        .get_user_by_i_ds(request(vec![id.to_string()], Some("203.0.113.7")))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unavailable);

    let status = client
        .get_user_by_i_ds(request(vec![id.to_string()], None))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unavailable);

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
