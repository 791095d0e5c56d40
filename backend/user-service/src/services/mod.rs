/// Business logic for user-service
///
/// `UserService` is shared by the public REST surface (signup/signin), the
/// admin REST surface and the gRPC directory.
mod auth;
mod users;

use sqlx::PgPool;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
