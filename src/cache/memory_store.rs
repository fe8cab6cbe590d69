//! In-process feed store

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::store::{
    CachedFeed, DeletionCompletion, FeedStore, InsertionCompletion, LocalFeedImage,
    RetrievalCompletion, StoreError,
};

/// Feed store that keeps the snapshot in memory
///
/// Useful when no durable storage is wanted. A store built with
/// `read_only` rejects inserts and deletes, standing in for an unwritable
/// destination.
#[derive(Debug, Default)]
pub struct InMemoryFeedStore {
    cache: Mutex<Option<CachedFeed>>,
    read_only: bool,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose writes always fail, optionally pre-seeded
    pub fn read_only(seed: Option<CachedFeed>) -> Self {
        Self {
            cache: Mutex::new(seed),
            read_only: true,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<CachedFeed>>, StoreError> {
        self.cache
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Unavailable("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl FeedStore for InMemoryFeedStore {
    fn retrieve(&self, completion: RetrievalCompletion) {
        let result = self.lock().map(|cache| cache.clone());
        completion(result);
    }

    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        let result = self.check_writable().and_then(|()| {
            *self.lock()? = Some(CachedFeed { feed, timestamp });
            Ok(())
        });
        completion(result);
    }

    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        let result = self.check_writable().and_then(|()| {
            self.lock()?.take();
            Ok(())
        });
        completion(result);
    }
}
