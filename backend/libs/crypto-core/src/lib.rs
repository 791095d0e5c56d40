//! Session token signing for the portal services.
//!
//! ## Modules
//! - `jwt`: HS384 token signer embedding the user profile

pub mod jwt;

pub use jwt::{TokenError, TokenSigner, TOKEN_TTL_HOURS};
