/// gRPC server module for user-service
///
/// Exports:
/// - UserDirectoryServer: `user.User` implementation
/// - SubnetInterceptor: `x-real-ip` trust check
/// - proto: Generated types from user_service.proto
pub mod interceptor;
pub mod server;

pub use interceptor::{SubnetInterceptor, REAL_IP_HEADER};
pub use server::{proto, start_grpc_server, UserDirectoryServer, GRPC_REQUEST_TIMEOUT};
