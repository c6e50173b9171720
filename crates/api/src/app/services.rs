//! Wiring of the item store, geocoder, token verifier and log sink.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use geoitems_auth::{cognito_jwks_url, JwksKeyProvider, KeyProvider, StaticKeyProvider, TokenVerifier};
use geoitems_infra::log_stream::RedisStreamLogSink;
use geoitems_infra::{
    AppConfig, AuthConfig, CoordinateResolver, GeocoderError, InMemoryItemStore, ItemStore,
    KeySource, PostgresItemStore, StoreError, ZippopotamResolver,
};
use geoitems_observability::{LogShipError, LogSink, NoopLogSink};

const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a request handler or middleware needs.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn ItemStore>,
    pub resolver: Arc<dyn CoordinateResolver>,
    pub verifier: TokenVerifier,
    pub log_sink: Arc<dyn LogSink>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn ItemStore>,
        resolver: Arc<dyn CoordinateResolver>,
        verifier: TokenVerifier,
        log_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            store,
            resolver,
            verifier,
            log_sink,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Geocoder(#[from] GeocoderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    LogSink(#[from] LogShipError),

    #[error("USER_POOL_ID {0:?} has no region prefix")]
    InvalidUserPool(String),
}

/// Build services from configuration, connecting to whichever backends are configured.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServiceError> {
    let store: Arc<dyn ItemStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresItemStore::connect(url).await?;
            store.ensure_schema().await?;
            info!("using postgres item store");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set; items are kept in memory");
            Arc::new(InMemoryItemStore::new())
        }
    };

    let resolver = ZippopotamResolver::new(&config.geocoder_base_url, config.geocoder_timeout)?;

    let log_sink: Arc<dyn LogSink> = match &config.log_stream {
        Some(stream) => {
            info!(stream = %stream.stream_name, "shipping request logs to redis stream");
            Arc::new(RedisStreamLogSink::new(&stream.redis_url, stream.stream_name.clone())?)
        }
        None => Arc::new(NoopLogSink),
    };

    Ok(AppServices::new(
        store,
        Arc::new(resolver),
        build_verifier(&config.auth)?,
        log_sink,
    ))
}

pub fn build_verifier(auth: &AuthConfig) -> Result<TokenVerifier, ServiceError> {
    let keys: Arc<dyn KeyProvider> = match &auth.key_source {
        KeySource::SharedSecret(secret) => {
            warn!("verifying tokens with a static HS256 secret; not for production");
            Arc::new(StaticKeyProvider::hs256(secret))
        }
        KeySource::JwksUrl(url) => Arc::new(JwksKeyProvider::new(url.clone(), JWKS_FETCH_TIMEOUT)),
        KeySource::UserPool(pool) => {
            let url = cognito_jwks_url(pool)
                .ok_or_else(|| ServiceError::InvalidUserPool(pool.clone()))?;
            Arc::new(JwksKeyProvider::new(url, JWKS_FETCH_TIMEOUT))
        }
    };
    Ok(TokenVerifier::new(keys, auth.client_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(key_source: KeySource) -> AuthConfig {
        AuthConfig {
            client_id: "client".to_string(),
            key_source,
        }
    }

    #[test]
    fn every_key_source_builds_a_verifier() {
        assert!(build_verifier(&auth(KeySource::SharedSecret("s".into()))).is_ok());
        assert!(build_verifier(&auth(KeySource::JwksUrl("http://idp/jwks.json".into()))).is_ok());
        assert!(build_verifier(&auth(KeySource::UserPool("us-east-1_abc".into()))).is_ok());
    }

    #[test]
    fn user_pool_without_region_is_rejected() {
        let result = build_verifier(&auth(KeySource::UserPool("abc".into())));
        assert!(matches!(result, Err(ServiceError::InvalidUserPool(ref pool)) if pool == "abc"));
    }
}
