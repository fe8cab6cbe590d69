//! Local feed cache
//!
//! This module provides the storage contract for the cached feed, the
//! freshness policy, the `LocalFeedLoader` engine that ties them together,
//! and two stores: a JSON file store and an in-memory store.

mod json_store;
mod loader;
mod memory_store;
mod policy;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use json_store::JsonFeedStore;
pub use loader::{Clock, LoadResult, LocalFeedLoader, SaveResult};
pub use memory_store::InMemoryFeedStore;
pub use policy::{is_valid, CachePolicy, MAX_CACHE_AGE_DAYS};
pub use store::{
    delete_feed, CachedFeed, DeletionCompletion, DeletionResult, FeedStore, InsertionCompletion,
    InsertionResult, LocalFeedImage, RetrievalCompletion, RetrievalResult, StoreError,
};
