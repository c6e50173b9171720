use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use geoitems_core::{Item, ItemChanges, ItemId};

use super::r#trait::{ItemStore, StoreError};

/// In-memory item store.
///
/// Intended for tests/dev; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("item store lock poisoned".to_string())
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.get(id).cloned())
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        if items.contains_key(&item.id) {
            return Err(StoreError::DuplicateKey(item.id));
        }
        items.insert(item.id, item);
        Ok(())
    }

    async fn update(&self, id: &ItemId, changes: &ItemChanges) -> Result<Item, StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        let item = items.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        item.apply(changes);
        Ok(item.clone())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        Ok(items.remove(id).is_some())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<Item> = items.values().cloned().collect();
        // Ids are time-ordered, so this lists items in creation order.
        all.sort_by_key(|item| item.id);
        Ok(all)
    }
}
