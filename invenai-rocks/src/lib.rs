//! RocksDB-backed item collection for InvenAI.

use std::path::Path;

use invenai_core::{InventoryItem, ItemCollection, ItemId};
use rocksdb::{DB, IteratorMode, Options};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RocksError {
    #[error("RocksDB error: {0}")]
    Engine(#[from] rocksdb::Error),
    #[error("malformed item record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// A persistent item collection backed by RocksDB.
pub struct RocksCollection {
    db: DB,
}

impl RocksCollection {
    /// Opens a RocksDB collection at the given path.
    ///
    /// Creates the database if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RocksError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

impl ItemCollection for RocksCollection {
    type Error = RocksError;

    fn list(&self) -> Result<Vec<InventoryItem>, Self::Error> {
        let mut items = Vec::new();
        for entry in self.db.iterator(IteratorMode::Start) {
            let (_key, value) = entry?;
            items.push(serde_json::from_slice::<InventoryItem>(&value)?);
        }
        items.sort_by(|a, b| a.chronological_key().cmp(&b.chronological_key()));
        Ok(items)
    }

    fn get(&self, id: &ItemId) -> Result<Option<InventoryItem>, Self::Error> {
        match self.db.get_pinned(id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, item: &InventoryItem) -> Result<(), Self::Error> {
        self.db.put(item.id.as_str(), serde_json::to_vec(item)?)?;
        Ok(())
    }

    fn remove(&self, id: &ItemId) -> Result<bool, Self::Error> {
        if !self.has(id)? {
            return Ok(false);
        }
        self.db.delete(id.as_str())?;
        Ok(true)
    }

    fn has(&self, id: &ItemId) -> Result<bool, Self::Error> {
        Ok(self.db.get_pinned(id.as_str())?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invenai_core::ItemDraft;
    use tempfile::TempDir;

    fn temp_collection() -> (RocksCollection, TempDir) {
        let dir = TempDir::new().unwrap();
        let collection = RocksCollection::open(dir.path()).unwrap();
        (collection, dir)
    }

    fn item(id: &str, day: u32) -> InventoryItem {
        ItemDraft::new(format!("item {id}"))
            .with_quantity(day)
            .into_item_with(ItemId::new(id), Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap())
    }

    #[test]
    fn put_get() {
        let (collection, _dir) = temp_collection();
        let lamp = item("lamp", 1);

        collection.put(&lamp).unwrap();

        assert_eq!(collection.get(&lamp.id).unwrap(), Some(lamp));
        assert_eq!(collection.get(&ItemId::new("nonexistent")).unwrap(), None);
    }

    #[test]
    fn list_oldest_first() {
        let (collection, _dir) = temp_collection();
        collection.put(&item("z", 1)).unwrap();
        collection.put(&item("a", 3)).unwrap();

        let ids: Vec<_> = collection
            .list()
            .unwrap()
            .into_iter()
            .map(|i| i.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["z", "a"]);
    }

    #[test]
    fn remove_reports_presence() {
        let (collection, _dir) = temp_collection();
        collection.put(&item("a", 1)).unwrap();

        assert!(collection.remove(&ItemId::new("a")).unwrap());
        assert!(!collection.remove(&ItemId::new("a")).unwrap());
        assert!(collection.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_record_is_codec_error() {
        let (collection, _dir) = temp_collection();
        collection.db.put("bad", b"not json").unwrap();

        assert!(matches!(
            collection.get(&ItemId::new("bad")),
            Err(RocksError::Codec(_))
        ));
    }

    #[test]
    fn persistence() {
        let dir = TempDir::new().unwrap();
        let lamp = item("lamp", 2);

        {
            let collection = RocksCollection::open(dir.path()).unwrap();
            collection.put(&lamp).unwrap();
        }

        {
            let collection = RocksCollection::open(dir.path()).unwrap();
            assert_eq!(collection.list().unwrap(), vec![lamp]);
        }
    }
}
