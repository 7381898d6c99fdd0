//! Fjall-backed item collection for InvenAI.

use std::path::Path;

use fjall::{Database, Keyspace, KeyspaceCreateOptions};
use invenai_core::{InventoryItem, ItemCollection, ItemId};
use thiserror::Error;

pub const DEFAULT_KEYSPACE: &str = "items";

#[derive(Debug, Error)]
pub enum FjallError {
    #[error("Fjall error: {0}")]
    Engine(#[from] fjall::Error),
    #[error("malformed item record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// A persistent item collection backed by Fjall.
///
/// Items are stored as JSON under their id. Listing returns them oldest first.
pub struct FjallCollection {
    keyspace: Keyspace,
    _database: Database, // Keep keyspace alive
}

impl FjallCollection {
    /// Opens a collection at the given path using the default keyspace.
    ///
    /// Creates the database if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FjallError> {
        Self::open_keyspace(path, DEFAULT_KEYSPACE)
    }

    /// Opens a collection at the given path with a specific keyspace name.
    pub fn open_keyspace(path: impl AsRef<Path>, keyspace: &str) -> Result<Self, FjallError> {
        let database = Database::builder(path).open()?;
        let keyspace = database.keyspace(keyspace, || KeyspaceCreateOptions::default())?;
        Ok(Self {
            keyspace,
            _database: database,
        })
    }
}

impl ItemCollection for FjallCollection {
    type Error = FjallError;

    fn list(&self) -> Result<Vec<InventoryItem>, Self::Error> {
        let mut items = Vec::new();
        for guard in self.keyspace.iter() {
            let (_key, value) = guard.into_inner()?;
            items.push(serde_json::from_slice::<InventoryItem>(&value)?);
        }
        items.sort_by(|a, b| a.chronological_key().cmp(&b.chronological_key()));
        Ok(items)
    }

    fn get(&self, id: &ItemId) -> Result<Option<InventoryItem>, Self::Error> {
        match self.keyspace.get(id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, item: &InventoryItem) -> Result<(), Self::Error> {
        let value = serde_json::to_vec(item)?;
        self.keyspace.insert(item.id.as_str(), value)?;
        Ok(())
    }

    fn remove(&self, id: &ItemId) -> Result<bool, Self::Error> {
        if !self.keyspace.contains_key(id.as_str())? {
            return Ok(false);
        }
        self.keyspace.remove(id.as_str())?;
        Ok(true)
    }

    fn has(&self, id: &ItemId) -> Result<bool, Self::Error> {
        self.keyspace
            .contains_key(id.as_str())
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invenai_core::{AsyncItemCollection, DeleteOutcome, ItemDraft};
    use tempfile::TempDir;

    fn temp_collection() -> (FjallCollection, TempDir) {
        let dir = TempDir::new().unwrap();
        let collection = FjallCollection::open(dir.path()).unwrap();
        (collection, dir)
    }

    fn item(id: &str, day: u32) -> InventoryItem {
        ItemDraft::new(format!("item {id}"))
            .into_item_with(ItemId::new(id), Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap())
    }

    #[test]
    fn put_get() {
        let (collection, _dir) = temp_collection();
        let chair = item("chair", 1);

        collection.put(&chair).unwrap();

        assert_eq!(collection.get(&chair.id).unwrap(), Some(chair));
    }

    #[test]
    fn get_missing() {
        let (collection, _dir) = temp_collection();
        assert_eq!(collection.get(&ItemId::new("nonexistent")).unwrap(), None);
    }

    #[test]
    fn put_replaces_all_fields() {
        let (collection, _dir) = temp_collection();
        collection.put(&item("a", 1)).unwrap();

        let renamed = InventoryItem {
            name: "renamed".to_string(),
            quantity: 0,
            ..item("a", 1)
        };
        collection.put(&renamed).unwrap();

        assert_eq!(collection.list().unwrap(), vec![renamed]);
    }

    #[test]
    fn list_oldest_first() {
        let (collection, _dir) = temp_collection();
        collection.put(&item("late", 9)).unwrap();
        collection.put(&item("early", 2)).unwrap();
        collection.put(&item("b-same", 5)).unwrap();
        collection.put(&item("a-same", 5)).unwrap();

        let ids: Vec<_> = collection
            .list()
            .unwrap()
            .into_iter()
            .map(|i| i.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["early", "a-same", "b-same", "late"]);
    }

    #[test]
    fn remove_reports_presence() {
        let (collection, _dir) = temp_collection();
        collection.put(&item("a", 1)).unwrap();

        assert!(collection.has(&ItemId::new("a")).unwrap());
        assert!(collection.remove(&ItemId::new("a")).unwrap());
        assert!(!collection.remove(&ItemId::new("a")).unwrap());
        assert!(!collection.has(&ItemId::new("a")).unwrap());
    }

    #[tokio::test]
    async fn delete_one_missing_is_not_found() {
        let (collection, _dir) = temp_collection();
        collection.put(&item("a", 1)).unwrap();

        let outcome = collection.delete_one(&ItemId::new("42")).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(collection.list().unwrap().len(), 1);
    }

    #[test]
    fn persistence() {
        let dir = TempDir::new().unwrap();
        let chair = item("chair", 1);

        {
            let collection = FjallCollection::open(dir.path()).unwrap();
            collection.put(&chair).unwrap();
        }

        {
            let collection = FjallCollection::open(dir.path()).unwrap();
            assert_eq!(collection.get(&chair.id).unwrap(), Some(chair));
        }
    }
}
