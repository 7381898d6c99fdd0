use std::convert::Infallible;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;

use crate::item::{InventoryItem, ItemId};

/// A durable keyed collection of inventory items.
///
/// Collections own serialization of items into whatever their engine stores;
/// callers only see whole `InventoryItem` records keyed by `ItemId`.
///
/// All methods take `&self` to support engines with internal locking (e.g., RocksDB).
pub trait ItemCollection {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every item in the collection.
    fn list(&self) -> Result<Vec<InventoryItem>, Self::Error>;

    /// Retrieves the item with the given id, or None if not present.
    fn get(&self, id: &ItemId) -> Result<Option<InventoryItem>, Self::Error>;

    /// Stores the item under its id, replacing all fields of any existing record.
    fn put(&self, item: &InventoryItem) -> Result<(), Self::Error>;

    /// Removes the item with the given id. Returns whether it was present.
    fn remove(&self, id: &ItemId) -> Result<bool, Self::Error>;

    /// Checks whether an item with the given id exists.
    fn has(&self, id: &ItemId) -> Result<bool, Self::Error> {
        Ok(self.get(id)?.is_some())
    }
}

/// An in-memory collection that lists items in insertion order.
///
/// Useful for testing and as a reference implementation.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    items: RwLock<IndexMap<ItemId, InventoryItem>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection pre-populated with the given items.
    pub fn with_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemCollection for MemoryCollection {
    type Error = Infallible;

    fn list(&self) -> Result<Vec<InventoryItem>, Self::Error> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.values().cloned().collect())
    }

    fn get(&self, id: &ItemId) -> Result<Option<InventoryItem>, Self::Error> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(id).cloned())
    }

    fn put(&self, item: &InventoryItem) -> Result<(), Self::Error> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn remove(&self, id: &ItemId) -> Result<bool, Self::Error> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        Ok(items.shift_remove(id).is_some())
    }

    fn has(&self, id: &ItemId) -> Result<bool, Self::Error> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: &str, name: &str) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(id),
            name: name.to_string(),
            description: String::new(),
            quantity: 1,
            category: String::new(),
            date_added: Utc::now(),
            image_url: String::new(),
        }
    }

    #[test]
    fn memory_collection_put_get() {
        let collection = MemoryCollection::new();
        let chair = item("1", "Chair");

        collection.put(&chair).unwrap();

        assert_eq!(collection.get(&ItemId::new("1")).unwrap(), Some(chair));
    }

    #[test]
    fn memory_collection_get_missing() {
        let collection = MemoryCollection::new();

        assert_eq!(collection.get(&ItemId::new("nope")).unwrap(), None);
    }

    #[test]
    fn memory_collection_overwrite_keeps_position() {
        let collection = MemoryCollection::with_items([item("1", "Chair"), item("2", "Desk")]);

        collection.put(&item("1", "Stool")).unwrap();

        let names: Vec<_> = collection.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Stool", "Desk"]);
    }

    #[test]
    fn memory_collection_remove() {
        let collection = MemoryCollection::with_items([item("1", "Chair"), item("2", "Desk")]);

        assert!(collection.remove(&ItemId::new("1")).unwrap());
        assert!(!collection.remove(&ItemId::new("1")).unwrap());
        assert!(!collection.has(&ItemId::new("1")).unwrap());
        assert_eq!(collection.len(), 1);
    }
}
