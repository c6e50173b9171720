use serde::{Deserialize, Serialize};

/// Claims of a verified identity token.
///
/// Only `sub` and `exp` are required; audience is checked during
/// verification and not carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the authenticated user).
    pub sub: String,

    /// Expiry, seconds since the epoch.
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// `id` or `access` for Cognito-issued tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,
}
