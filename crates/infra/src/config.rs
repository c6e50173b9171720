//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://api.zippopotam.us";
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_STREAM_NAME: &str = "items-api-logs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("no token key source configured; set JWT_HS256_SECRET, JWKS_URL or USER_POOL_ID")]
    NoKeySource,
}

/// Where token signing keys come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// HS256 shared secret, for local development and tests.
    SharedSecret(String),
    /// Explicit JWKS document URL.
    JwksUrl(String),
    /// Cognito user pool id; the JWKS URL is derived from it.
    UserPool(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Expected token audience.
    pub client_id: String,
    pub key_source: KeySource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamConfig {
    pub redis_url: String,
    pub stream_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub geocoder_base_url: String,
    pub geocoder_timeout: Duration,
    pub auth: AuthConfig,
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Request-log shipping target; shipping is disabled when unset.
    pub log_stream: Option<LogStreamConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDR",
                message: e.to_string(),
            })?;

        let geocoder_timeout = match get("GEOCODER_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "GEOCODER_TIMEOUT_SECS",
                message: e.to_string(),
            })?,
            None => DEFAULT_GEOCODER_TIMEOUT_SECS,
        };

        let client_id = get("CLIENT_ID").ok_or(ConfigError::Missing("CLIENT_ID"))?;
        let key_source = if let Some(secret) = get("JWT_HS256_SECRET") {
            KeySource::SharedSecret(secret)
        } else if let Some(url) = get("JWKS_URL") {
            KeySource::JwksUrl(url)
        } else if let Some(pool) = get("USER_POOL_ID") {
            KeySource::UserPool(pool)
        } else {
            return Err(ConfigError::NoKeySource);
        };

        let log_stream = get("REDIS_URL").map(|redis_url| LogStreamConfig {
            redis_url,
            stream_name: get("LOG_STREAM_NAME")
                .unwrap_or_else(|| DEFAULT_LOG_STREAM_NAME.to_string()),
        });

        Ok(Self {
            bind_addr,
            geocoder_base_url: get("GEOCODER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_BASE_URL.to_string()),
            geocoder_timeout: Duration::from_secs(geocoder_timeout),
            auth: AuthConfig {
                client_id,
                key_source,
            },
            database_url: get("DATABASE_URL"),
            log_stream,
        })
    }
}
