//! Postcode to coordinate lookup.

use std::time::Duration;

use async_trait::async_trait;
use geoitems_core::Coordinates;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Resolves a postcode to a point. Lookup failures of any kind yield `None`.
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    async fn resolve(&self, postcode: &str) -> Option<Coordinates>;
}

#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("invalid geocoder base url: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Resolver backed by the Zippopotam US postcode service.
#[derive(Debug, Clone)]
pub struct ZippopotamResolver {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    latitude: JsonValue,
    longitude: JsonValue,
}

impl ZippopotamResolver {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeocoderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocoderError::Client(e.to_string()))?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, GeocoderError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GeocoderError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GeocoderError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// `{base}/us/{postcode}` with the postcode encoded as a single segment.
    fn lookup_url(&self, postcode: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("us").push(postcode);
        }
        url
    }

    async fn lookup(&self, postcode: &str) -> Result<Option<Coordinates>, String> {
        let response = self
            .client
            .get(self.lookup_url(postcode))
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "postcode not resolved");
            return Ok(None);
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed response body: {e}"))?;

        let Some(place) = body.places.first() else {
            return Ok(None);
        };
        match (degrees(&place.latitude), degrees(&place.longitude)) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon))),
            _ => Err("place has non-numeric coordinates".to_string()),
        }
    }
}

/// The provider sends coordinates as strings; plain numbers are accepted too.
fn degrees(value: &JsonValue) -> Option<f64> {
    let parsed: Option<f64> = match value {
        JsonValue::String(s) => s.trim().parse().ok(),
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[async_trait]
impl CoordinateResolver for ZippopotamResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, postcode: &str) -> Option<Coordinates> {
        match self.lookup(postcode).await {
            Ok(found) => found,
            Err(reason) => {
                warn!(postcode, "postcode lookup failed: {reason}");
                None
            }
        }
    }
}
