use std::path::{Path, PathBuf};

use invenai_core::{InventoryItem, ItemCollection, ItemId};
use invenai_fjall::FjallCollection;
use invenai_rocks::RocksCollection;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnyCollectionError {
    #[error("fjall error: {0}")]
    Fjall(#[from] invenai_fjall::FjallError),
    #[error("rocks error: {0}")]
    Rocks(#[from] invenai_rocks::RocksError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Fjall,
    Rocks,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fjall" => Ok(StoreType::Fjall),
            "rocks" | "rocksdb" => Ok(StoreType::Rocks),
            _ => Err(format!("unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Fjall => write!(f, "fjall"),
            StoreType::Rocks => write!(f, "rocks"),
        }
    }
}

/// The durable collection the server persists to, chosen at startup.
pub enum AnyCollection {
    Fjall(FjallCollection),
    Rocks(RocksCollection),
}

impl AnyCollection {
    pub fn open(store_type: StoreType, path: impl AsRef<Path>) -> Result<Self, AnyCollectionError> {
        match store_type {
            StoreType::Fjall => Ok(Self::Fjall(FjallCollection::open(path)?)),
            StoreType::Rocks => Ok(Self::Rocks(RocksCollection::open(path)?)),
        }
    }
}

impl ItemCollection for AnyCollection {
    type Error = AnyCollectionError;

    fn list(&self) -> Result<Vec<InventoryItem>, Self::Error> {
        match self {
            AnyCollection::Fjall(c) => c.list().map_err(Into::into),
            AnyCollection::Rocks(c) => c.list().map_err(Into::into),
        }
    }

    fn get(&self, id: &ItemId) -> Result<Option<InventoryItem>, Self::Error> {
        match self {
            AnyCollection::Fjall(c) => c.get(id).map_err(Into::into),
            AnyCollection::Rocks(c) => c.get(id).map_err(Into::into),
        }
    }

    fn put(&self, item: &InventoryItem) -> Result<(), Self::Error> {
        match self {
            AnyCollection::Fjall(c) => c.put(item).map_err(Into::into),
            AnyCollection::Rocks(c) => c.put(item).map_err(Into::into),
        }
    }

    fn remove(&self, id: &ItemId) -> Result<bool, Self::Error> {
        match self {
            AnyCollection::Fjall(c) => c.remove(id).map_err(Into::into),
            AnyCollection::Rocks(c) => c.remove(id).map_err(Into::into),
        }
    }

    fn has(&self, id: &ItemId) -> Result<bool, Self::Error> {
        match self {
            AnyCollection::Fjall(c) => c.has(id).map_err(Into::into),
            AnyCollection::Rocks(c) => c.has(id).map_err(Into::into),
        }
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invenai")
        .join("store")
}
