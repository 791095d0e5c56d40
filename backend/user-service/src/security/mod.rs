/// Security primitives for user-service
pub mod password;

pub use password::{hash_password, verify_dummy, verify_password};
