//! Local feed loader: the cache engine
//!
//! `LocalFeedLoader` saves, loads and validates the cached feed on top of any
//! `FeedStore`. It keeps no state between calls. Every store continuation
//! only holds a `Weak` handle to the loader, so dropping the last
//! `Arc<LocalFeedLoader>` silently abandons whatever is still in flight:
//! no completion fires and no follow-up store call is made.

use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::channel::oneshot;
use tracing::{debug, warn};

use super::policy::CachePolicy;
use super::store::{FeedStore, LocalFeedImage, StoreError};
use crate::feed::{FeedImage, FeedLoader};

/// Result delivered by `LocalFeedLoader::save`
pub type SaveResult = Result<(), StoreError>;

/// Result delivered by `LocalFeedLoader::load`
pub type LoadResult = Result<Vec<FeedImage>, StoreError>;

/// Source of the current instant
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Cache engine over a `FeedStore`
pub struct LocalFeedLoader<S: FeedStore + ?Sized> {
    store: Arc<S>,
    current_date: Clock,
    policy: CachePolicy,
}

impl<S: FeedStore + ?Sized> fmt::Debug for LocalFeedLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFeedLoader")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: FeedStore + ?Sized + 'static> LocalFeedLoader<S> {
    /// Creates a loader over `store`, reading "now" from `current_date`
    pub fn new<C>(store: Arc<S>, current_date: C) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            store,
            current_date: Arc::new(current_date),
            policy: CachePolicy::default(),
        }
    }

    /// Replaces the default seven-day policy
    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn now(&self) -> DateTime<Utc> {
        (self.current_date)()
    }

    /// Replaces the cached feed with `feed`
    ///
    /// Deletes the existing cache first; the insert is only issued once the
    /// deletion succeeded, stamped with the instant at that point.
    pub fn save<F>(self: &Arc<Self>, feed: Vec<FeedImage>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let loader = Arc::downgrade(self);
        self.store.delete_cached_feed(Box::new(move |result| {
            let Some(loader) = upgrade(&loader, "save") else {
                return;
            };
            match result {
                Ok(()) => loader.cache(feed, completion),
                Err(error) => {
                    debug!(%error, "cache deletion failed, skipping insert");
                    completion(Err(error));
                }
            }
        }));
    }

    fn cache<F>(self: &Arc<Self>, feed: Vec<FeedImage>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let local: Vec<LocalFeedImage> = feed.into_iter().map(LocalFeedImage::from).collect();
        let timestamp = self.now();
        debug!(count = local.len(), %timestamp, "inserting feed into cache");

        let loader = Arc::downgrade(self);
        self.store.insert(
            local,
            timestamp,
            Box::new(move |result| {
                if upgrade(&loader, "save").is_none() {
                    return;
                }
                if let Err(ref error) = result {
                    debug!(%error, "cache insertion failed");
                }
                completion(result);
            }),
        );
    }

    /// Delivers the cached feed if it is still fresh
    ///
    /// An empty or expired cache is delivered as an empty feed. A retrieval
    /// error is delivered as is and never triggers a deletion.
    pub fn load<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce(LoadResult) + Send + 'static,
    {
        let loader = Arc::downgrade(self);
        self.store.retrieve(Box::new(move |result| {
            let Some(loader) = upgrade(&loader, "load") else {
                return;
            };
            match result {
                Err(error) => {
                    debug!(%error, "cache retrieval failed");
                    completion(Err(error));
                }
                Ok(Some(cache)) if loader.policy.validate(cache.timestamp, loader.now()) => {
                    debug!(count = cache.feed.len(), "serving fresh cache");
                    completion(Ok(cache.feed.into_iter().map(FeedImage::from).collect()));
                }
                Ok(Some(cache)) => {
                    debug!(timestamp = %cache.timestamp, "cache expired");
                    completion(Ok(Vec::new()));
                }
                Ok(None) => completion(Ok(Vec::new())),
            }
        }));
    }

    /// Purges a cache that is expired or cannot be read
    ///
    /// Nothing is reported back; failures are only logged.
    pub fn validate_cache(self: &Arc<Self>) {
        let loader = Arc::downgrade(self);
        self.store.retrieve(Box::new(move |result| {
            let Some(loader) = upgrade(&loader, "validate_cache") else {
                return;
            };
            match result {
                Err(error) => {
                    warn!(%error, "cache unreadable, deleting it");
                    loader.purge();
                }
                Ok(Some(cache)) if !loader.policy.validate(cache.timestamp, loader.now()) => {
                    warn!(timestamp = %cache.timestamp, "cache expired, deleting it");
                    loader.purge();
                }
                Ok(_) => {}
            }
        }));
    }

    fn purge(&self) {
        self.store.delete_cached_feed(Box::new(|result| {
            if let Err(error) = result {
                warn!(%error, "failed to delete cache");
            }
        }));
    }

    /// Awaitable form of `load`
    pub async fn load_feed(self: &Arc<Self>) -> LoadResult {
        let (tx, rx) = oneshot::channel();
        self.load(move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or_else(|_| Err(StoreError::dropped_completion()))
    }

    /// Awaitable form of `save`
    pub async fn save_feed(self: &Arc<Self>, feed: Vec<FeedImage>) -> SaveResult {
        let (tx, rx) = oneshot::channel();
        self.save(feed, move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or_else(|_| Err(StoreError::dropped_completion()))
    }
}

fn upgrade<T>(loader: &Weak<T>, operation: &str) -> Option<Arc<T>> {
    let loader = loader.upgrade();
    if loader.is_none() {
        debug!(operation, "loader released before store completed, dropping result");
    }
    loader
}

#[async_trait]
impl<S: FeedStore + ?Sized + 'static> FeedLoader for Arc<LocalFeedLoader<S>> {
    type Error = StoreError;

    async fn load(&self) -> Result<Vec<FeedImage>, StoreError> {
        self.load_feed().await
    }
}
