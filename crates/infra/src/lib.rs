//! Infrastructure layer: configuration, item persistence, geocoding and log shipping.

pub mod config;
pub mod geocoding;
pub mod item_store;
pub mod log_stream;

pub use config::{AppConfig, AuthConfig, ConfigError, KeySource, LogStreamConfig};
pub use geocoding::{CoordinateResolver, GeocoderError, ZippopotamResolver};
pub use item_store::{InMemoryItemStore, ItemStore, PostgresItemStore, StoreError};
