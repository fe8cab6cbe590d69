//! Storage contract for the feed cache
//!
//! A `FeedStore` persists at most one `CachedFeed` and reports every outcome
//! through a completion that it must call exactly once.

use chrono::{DateTime, Utc};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::feed::FeedImage;

/// Cache-side copy of a feed image
///
/// Kept separate from `FeedImage` so the stored representation can change
/// without touching the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl From<FeedImage> for LocalFeedImage {
    fn from(image: FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description,
            location: image.location,
            url: image.url,
        }
    }
}

impl From<LocalFeedImage> for FeedImage {
    fn from(local: LocalFeedImage) -> Self {
        FeedImage {
            id: local.id,
            description: local.description,
            location: local.location,
            url: local.url,
        }
    }
}

/// The single snapshot a store holds: the feed and when it was saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedImage>,
    pub timestamp: DateTime<Utc>,
}

/// Errors reported by a feed store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or removing the backing file failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored snapshot could not be decoded or encoded
    #[error("Stored feed is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    /// The backing resource refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Reported when a store drops a completion without calling it
    pub(crate) fn dropped_completion() -> Self {
        StoreError::Unavailable("store dropped the completion".to_string())
    }
}

pub type RetrievalResult = Result<Option<CachedFeed>, StoreError>;
pub type InsertionResult = Result<(), StoreError>;
pub type DeletionResult = Result<(), StoreError>;

pub type RetrievalCompletion = Box<dyn FnOnce(RetrievalResult) + Send + 'static>;
pub type InsertionCompletion = Box<dyn FnOnce(InsertionResult) + Send + 'static>;
pub type DeletionCompletion = Box<dyn FnOnce(DeletionResult) + Send + 'static>;

/// Persistence backend for the feed cache
///
/// Implementations must invoke each completion exactly once and must not call
/// back into themselves from inside an operation.
pub trait FeedStore: Send + Sync {
    /// Delivers the stored snapshot, `None` when nothing is stored
    ///
    /// Retrieval has no side effects.
    fn retrieve(&self, completion: RetrievalCompletion);

    /// Replaces whatever is stored with `feed` saved at `timestamp`
    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    );

    /// Removes the stored snapshot; succeeds when there is nothing to remove
    fn delete_cached_feed(&self, completion: DeletionCompletion);
}

/// Awaitable form of `FeedStore::delete_cached_feed`
pub async fn delete_feed<S: FeedStore + ?Sized>(store: &S) -> DeletionResult {
    let (tx, rx) = oneshot::channel();
    store.delete_cached_feed(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.await.unwrap_or_else(|_| Err(StoreError::dropped_completion()))
}
