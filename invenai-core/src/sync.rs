//! Sync operations between the local store and a gateway.
//!
//! Hydration replaces the local collection with the remote one, commit pushes
//! the whole local collection as one bulk upsert, and deletes are confirmed
//! remotely before the local record is dropped. On any failure the local
//! collection is left exactly as it was.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::{info, warn};

use crate::async_collection::{AsyncItemCollection, DeleteOutcome};
use crate::inventory::{Action, Dispatch};
use crate::item::{InventoryItem, ItemId};

/// Error during sync operations. Always recoverable: the caller reports it
/// and the local collection is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum SyncError<E> {
    #[error("failed to fetch inventory items: {0}")]
    Hydrate(E),
    #[error("failed to save inventory items: {0}")]
    Commit(E),
    #[error("failed to delete item {id}: {error}")]
    Delete { id: ItemId, error: E },
}

/// Bounded retry for idempotent gateway calls (list, delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero behaves like one.
    pub attempts: u32,
    /// Delay before the second attempt; grows linearly per attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retry.
    pub const NONE: RetryPolicy = RetryPolicy {
        attempts: 1,
        backoff: Duration::ZERO,
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, operation: &str, mut call: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                warn!("{operation} failed (attempt {attempt}/{attempts}): {e}");
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Loads the full remote collection into the store.
///
/// Returns the number of items loaded. On failure nothing is dispatched, so
/// the store keeps whatever it held before (empty on first mount).
pub async fn hydrate<G, D>(
    gateway: &G,
    store: &D,
    retry: RetryPolicy,
) -> Result<usize, SyncError<G::Error>>
where
    G: AsyncItemCollection,
    D: Dispatch + Sync,
{
    let items = with_retry(retry, "list items", move || gateway.list_all())
        .await
        .map_err(SyncError::Hydrate)?;
    let count = items.len();
    if store.dispatch(Action::SetItems(items)) {
        info!("hydrated {count} items");
    }
    Ok(count)
}

/// Pushes a snapshot of the local collection to the gateway as one bulk upsert.
///
/// Not retried: a partial batch failure is reported once and the user may
/// commit again.
pub async fn commit<G>(gateway: &G, items: &[InventoryItem]) -> Result<usize, SyncError<G::Error>>
where
    G: AsyncItemCollection,
{
    gateway
        .upsert_many(items)
        .await
        .map_err(SyncError::Commit)?;
    info!("committed {} items", items.len());
    Ok(items.len())
}

/// Deletes an item remotely, then removes it locally once confirmed.
///
/// A remote "not found" also confirms absence and removes the local copy. A
/// remote failure leaves the local item in place.
pub async fn delete_confirmed<G, D>(
    gateway: &G,
    store: &D,
    id: &ItemId,
    retry: RetryPolicy,
) -> Result<DeleteOutcome, SyncError<G::Error>>
where
    G: AsyncItemCollection,
    D: Dispatch + Sync,
{
    let outcome = with_retry(retry, "delete item", move || gateway.delete_one(id))
        .await
        .map_err(|error| SyncError::Delete {
            id: id.clone(),
            error,
        })?;
    store.dispatch(Action::RemoveItem(id.clone()));
    info!("delete {id}: {}", outcome.message());
    Ok(outcome)
}
