use invenai_core::{DraftError, ItemId, SyncError};
use invenai_http::RemoteError;
use thiserror::Error;

use crate::store::AnyCollectionError;

#[derive(Debug, Error)]
pub enum InvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] AnyCollectionError),

    #[error("Server error: {0}")]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Sync(#[from] SyncError<RemoteError>),

    #[error("Invalid item: {0}")]
    Draft(#[from] DraftError),

    #[error("Invalid bind address: {0}")]
    InvalidBind(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("No suggestion #{index}: only {count} available")]
    NoSuggestion { index: usize, count: usize },
}
