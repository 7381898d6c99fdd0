use crate::async_collection::{AsyncItemCollection, DeleteOutcome};
use crate::inventory::InventoryStore;
use crate::item::{InventoryItem, ItemId};
use crate::producer::ItemDraft;
use crate::stats::InventoryStats;
use crate::sync::{self, RetryPolicy, SyncError};

/// A local store paired with the gateway it hydrates from and commits to.
///
/// Edits are applied locally right away; nothing reaches the gateway until
/// [`commit`](Self::commit), except deletes which go remote first.
pub struct InventorySession<G> {
    gateway: G,
    store: InventoryStore,
    retry: RetryPolicy,
}

impl<G: AsyncItemCollection> InventorySession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            store: InventoryStore::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Replaces the local collection with the gateway's.
    pub async fn hydrate(&self) -> Result<usize, SyncError<G::Error>> {
        sync::hydrate(&self.gateway, &self.store, self.retry).await
    }

    /// Turns a draft into an item and appends it locally.
    pub fn add(&self, draft: ItemDraft) -> InventoryItem {
        let item = draft.into_item();
        self.store.add_item(item.clone());
        item
    }

    /// Replaces a local record. Returns false (and changes nothing) for an unknown id.
    pub fn update(&self, item: InventoryItem) -> bool {
        let known = self.store.get(&item.id).is_some();
        self.store.update_item(item);
        known
    }

    /// Pushes the whole local collection to the gateway.
    pub async fn commit(&self) -> Result<usize, SyncError<G::Error>> {
        sync::commit(&self.gateway, &self.store.snapshot()).await
    }

    /// Deletes remotely, then locally once the gateway confirms.
    pub async fn delete(&self, id: &ItemId) -> Result<DeleteOutcome, SyncError<G::Error>> {
        sync::delete_confirmed(&self.gateway, &self.store, id, self.retry).await
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.store.snapshot()
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats::from_items(&self.store.snapshot())
    }
}
