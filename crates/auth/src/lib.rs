//! `geoitems-auth`: bearer-token authentication boundary.
//!
//! This crate is decoupled from HTTP frameworks and storage: it turns an
//! `Authorization` header value into verified [`Claims`] or an [`AuthError`].

pub mod bearer;
pub mod claims;
pub mod error;
pub mod keys;
pub mod verifier;

pub use bearer::extract_bearer;
pub use claims::Claims;
pub use error::AuthError;
pub use keys::{cognito_jwks_url, JwksKeyProvider, KeyProvider, StaticKeyProvider};
pub use verifier::TokenVerifier;
