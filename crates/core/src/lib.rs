//! `geoitems-core`: domain foundation for postcode-geocoded items.
//!
//! This crate contains **pure domain** code (no infrastructure concerns):
//! the item model, the geospatial calculator and the input validator.

pub mod error;
pub mod geo;
pub mod id;
pub mod item;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use geo::{Coordinates, Direction, GeoFields, REFERENCE_POINT};
pub use id::ItemId;
pub use item::{Item, ItemChanges, NewItem};
pub use validation::{ItemDraft, ItemPatch, ValidationError};
