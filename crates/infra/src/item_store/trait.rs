use async_trait::async_trait;
use thiserror::Error;

use geoitems_core::{Item, ItemChanges, ItemId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("item {0} already exists")]
    DuplicateKey(ItemId),

    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored document could not be decoded: {0}")]
    Serialization(String),
}

/// Key-value access to item records.
///
/// Each call is atomic for the key it touches.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Insert a new record; fails with [`StoreError::DuplicateKey`] if the id is taken.
    async fn put(&self, item: Item) -> Result<(), StoreError>;

    /// Merge `changes` into an existing record and return the merged record.
    async fn update(&self, id: &ItemId, changes: &ItemChanges) -> Result<Item, StoreError>;

    /// Remove a record. Returns whether anything was removed.
    async fn delete(&self, id: &ItemId) -> Result<bool, StoreError>;

    async fn scan(&self) -> Result<Vec<Item>, StoreError>;
}
