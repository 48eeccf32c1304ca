//! Bearer-token authentication.
//!
//! ID tokens from the identity provider are verified against its JWKS; the
//! caller's role comes from their document in the `users` collection (see
//! [`crate::core::middleware::auth_middleware`]).

mod jwks;
mod validator;

pub mod guards;
pub mod model;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
