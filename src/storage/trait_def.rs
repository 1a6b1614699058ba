use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ClickEvent, UrlEntry};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend contract for the URL store.
///
/// Implementations own the event lists: `get` and `list` return snapshot
/// clones, so aggregation over a returned entry never observes a
/// concurrent append tearing the sequence.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a new shortened URL under a caller-provided code.
    ///
    /// Returns [`StorageError::Conflict`] when the code is already taken,
    /// so callers can regenerate and retry.
    async fn create_with_code(&self, short_code: &str, original_url: &str)
        -> StorageResult<UrlEntry>;

    /// Get a snapshot of one entry by short code.
    async fn get(&self, short_code: &str) -> Result<Option<UrlEntry>>;

    /// Append one click event to an entry's history.
    ///
    /// Returns `false` when the short code is unknown.
    async fn append_event(&self, short_code: &str, event: ClickEvent) -> Result<bool>;

    /// Snapshot of every entry in insertion order.
    async fn list(&self) -> Result<Vec<UrlEntry>>;
}
