//! InvenAI core: the local inventory state container and its sync contract
//! with a remote item collection.
//!
//! Core concepts:
//! - **InventoryItem**: the single entity, keyed by a caller-assigned `ItemId`
//! - **Action / reduce**: tagged state transitions and the pure function applying them
//! - **InventoryStore**: observable in-memory collection driven by `dispatch`
//! - **ItemCollection / AsyncItemCollection**: durable keyed collections (the gateway)
//! - **sync**: hydrate, commit and confirmed delete between the two
//! - **producer**: drafts from forms, suggestions, descriptions and image recognition
//!
//! # Example
//!
//! ```
//! use invenai_core::{InventorySession, ItemDraft, MemoryCollection};
//!
//! # tokio_test_block(async {
//! let session = InventorySession::new(MemoryCollection::new());
//! session.hydrate().await.unwrap();
//!
//! let chair = session.add(ItemDraft::new("Chair").with_quantity(4));
//! assert_eq!(session.items(), vec![chair]);
//!
//! session.commit().await.unwrap();
//! assert_eq!(session.gateway().len(), 1);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f)
//! # }
//! ```

mod async_collection;
mod collection;
mod inventory;
mod item;
mod session;
mod stats;

pub mod producer;
pub mod sync;

pub use async_collection::{AsyncItemCollection, DeleteOutcome};
pub use collection::{ItemCollection, MemoryCollection};
pub use inventory::{Action, Dispatch, InventoryStore, Subscription, WeakInventoryStore, reduce};
pub use item::{InventoryItem, ItemId, UNCATEGORIZED, quantity};
pub use producer::{Described, DraftError, ItemDraft, ManualForm, Recognition};
pub use session::InventorySession;
pub use stats::{CategoryStats, InventoryStats};
pub use sync::{RetryPolicy, SyncError};
