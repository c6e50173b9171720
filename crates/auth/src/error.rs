use thiserror::Error;

/// Why a request could not be authenticated.
///
/// Every variant maps to a 401 at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No Authorization header present")]
    NoAuthHeader,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The identity provider's key set could not be loaded.
    #[error("Unable to load signing keys: {0}")]
    KeyFetch(String),
}

impl AuthError {
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn key_fetch(msg: impl Into<String>) -> Self {
        Self::KeyFetch(msg.into())
    }
}
