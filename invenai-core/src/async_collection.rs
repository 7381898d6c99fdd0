use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::collection::ItemCollection;
use crate::item::{InventoryItem, ItemId};

/// Result of a delete against a remote collection.
///
/// Deleting an absent id is not an error; both outcomes mean the item is
/// gone remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteOutcome {
    /// User-facing confirmation message.
    pub fn message(self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "Item deleted successfully",
            DeleteOutcome::NotFound => "Item not found. No action taken.",
        }
    }
}

/// Async item collection: the gateway the local store syncs against.
///
/// Mirrors `ItemCollection` with async methods so network-backed
/// implementations (the HTTP `RemoteCollection`) fit the same seam. Method
/// names differ from `ItemCollection` to avoid collisions when a type
/// implements both.
pub trait AsyncItemCollection: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_all(&self) -> impl Future<Output = Result<Vec<InventoryItem>, Self::Error>> + Send;
    fn get_one(
        &self,
        id: &ItemId,
    ) -> impl Future<Output = Result<Option<InventoryItem>, Self::Error>> + Send;
    fn upsert_one(&self, item: &InventoryItem) -> impl Future<Output = Result<(), Self::Error>> + Send;
    fn remove_one(&self, id: &ItemId) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Upserts every item by id - default impl calls upsert_one() in sequence
    /// and stops at the first failure, reported once for the whole batch.
    fn upsert_many(
        &self,
        items: &[InventoryItem],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let items = items.to_vec();
        async move {
            for item in &items {
                self.upsert_one(item).await?;
            }
            Ok(())
        }
    }

    /// Confirms existence with get_one(), then removes.
    fn delete_one(&self, id: &ItemId) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send {
        let id = id.clone();
        async move {
            if self.get_one(&id).await?.is_none() {
                return Ok(DeleteOutcome::NotFound);
            }
            self.remove_one(&id).await?;
            Ok(DeleteOutcome::Deleted)
        }
    }
}

/// Blanket impl: any sync `ItemCollection` is also an `AsyncItemCollection`.
impl<C: ItemCollection + Send + Sync> AsyncItemCollection for C {
    type Error = C::Error;

    async fn list_all(&self) -> Result<Vec<InventoryItem>, Self::Error> {
        self.list()
    }

    async fn get_one(&self, id: &ItemId) -> Result<Option<InventoryItem>, Self::Error> {
        self.get(id)
    }

    async fn upsert_one(&self, item: &InventoryItem) -> Result<(), Self::Error> {
        self.put(item)
    }

    async fn remove_one(&self, id: &ItemId) -> Result<bool, Self::Error> {
        self.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCollection;
    use chrono::Utc;

    fn item(id: &str, quantity: u32) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(id),
            name: format!("item {id}"),
            description: String::new(),
            quantity,
            category: String::new(),
            date_added: Utc::now(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn collection_as_gateway_upsert_many() {
        let collection = MemoryCollection::with_items([item("a", 1)]);

        collection
            .upsert_many(&[item("a", 5), item("b", 2)])
            .await
            .unwrap();

        let all = collection.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].quantity, 5);
        assert_eq!(all[1].id.as_str(), "b");
    }

    #[tokio::test]
    async fn collection_as_gateway_delete_one() {
        let collection = MemoryCollection::with_items([item("a", 1)]);

        let outcome = collection.delete_one(&ItemId::new("a")).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        let outcome = collection.delete_one(&ItemId::new("a")).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert!(collection.is_empty());
    }

    #[test]
    fn delete_outcome_messages() {
        assert_eq!(DeleteOutcome::Deleted.message(), "Item deleted successfully");
        assert_eq!(
            DeleteOutcome::NotFound.message(),
            "Item not found. No action taken."
        );
    }
}
