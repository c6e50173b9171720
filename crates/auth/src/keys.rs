//! Signing-key providers for token verification.
//!
//! A provider is constructed once and shared by the verifier; nothing here
//! lives in process-wide state.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::AuthError;

/// Source of the key used to check a token's signature.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Signature algorithm tokens must use with this provider's keys.
    fn algorithm(&self) -> Algorithm;

    /// Key for a token whose header carries `kid` (if any).
    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError>;
}

/// HS256 shared-secret provider for development and tests.
#[derive(Clone)]
pub struct StaticKeyProvider {
    key: DecodingKey,
}

impl StaticKeyProvider {
    pub fn hs256(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    fn algorithm(&self) -> Algorithm {
        Algorithm::HS256
    }

    async fn decoding_key(&self, _kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        Ok(self.key.clone())
    }
}

#[derive(Clone)]
struct SigningKey {
    kid: Option<String>,
    key: DecodingKey,
}

/// RS256 provider backed by an identity provider's JSON Web Key Set.
///
/// The key set is fetched on first use and kept for the provider's lifetime.
/// Concurrent first calls wait on the same initialization; a failed fetch is
/// not cached, so the next call tries again.
pub struct JwksKeyProvider {
    url: String,
    client: reqwest::Client,
    keys: OnceCell<Vec<SigningKey>>,
}

impl JwksKeyProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self::with_client(url, client)
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            keys: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url), err)]
    async fn fetch(&self) -> Result<Vec<SigningKey>, AuthError> {
        debug!("fetching signing keys");
        let set: JwkSet = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AuthError::key_fetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::key_fetch(e.to_string()))?;

        let keys: Vec<SigningKey> = set
            .keys
            .iter()
            .filter_map(|jwk| match DecodingKey::from_jwk(jwk) {
                Ok(key) => Some(SigningKey {
                    kid: jwk.common.key_id.clone(),
                    key,
                }),
                Err(e) => {
                    warn!(kid = ?jwk.common.key_id, "skipping unusable key: {e}");
                    None
                }
            })
            .collect();

        if keys.is_empty() {
            return Err(AuthError::key_fetch("key set contains no usable keys"));
        }
        Ok(keys)
    }
}

#[async_trait]
impl KeyProvider for JwksKeyProvider {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RS256
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        let keys = self.keys.get_or_try_init(|| self.fetch()).await?;

        // Match on kid when the token names one, otherwise use the first key.
        let chosen = kid
            .and_then(|kid| keys.iter().find(|k| k.kid.as_deref() == Some(kid)))
            .or_else(|| keys.first())
            .ok_or_else(|| AuthError::key_fetch("key set is empty"))?;

        Ok(chosen.key.clone())
    }
}

/// Well-known JWKS location of a Cognito user pool (`<region>_<id>`).
pub fn cognito_jwks_url(user_pool_id: &str) -> Option<String> {
    let (region, _) = user_pool_id.split_once('_')?;
    if region.is_empty() {
        return None;
    }
    Some(format!(
        "https://cognito-idp.{region}.amazonaws.com/{user_pool_id}/.well-known/jwks.json"
    ))
}
