//! JSON-on-disk feed store
//!
//! Persists the cached feed as a single JSON document. Writes go to a
//! temporary sibling file that is renamed over the target, so a failed save
//! never leaves a half-written document behind.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::store::{
    CachedFeed, DeletionCompletion, FeedStore, InsertionCompletion, LocalFeedImage,
    RetrievalCompletion, RetrievalResult, StoreError,
};

/// File name used inside the default cache directory
const STORE_FILE_NAME: &str = "feed.json";

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
struct Cache {
    /// The cached feed, in the order it was saved
    feed: Vec<LocalFeedImage>,
    /// When the feed was saved
    timestamp: DateTime<Utc>,
}

/// Feed store backed by a JSON file
///
/// Completions are invoked before each method returns.
#[derive(Debug, Clone)]
pub struct JsonFeedStore {
    /// Location of the JSON document
    store_path: PathBuf,
}

impl JsonFeedStore {
    /// Creates a store that keeps its document at `store_path`
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    /// Returns the XDG-compliant default document path
    ///
    /// Uses `~/.cache/feedcache/feed.json` on Linux, or the equivalent on other
    /// platforms. Returns `None` if no home directory can be determined.
    pub fn default_location() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "feedcache")?;
        Some(project_dirs.cache_dir().join(STORE_FILE_NAME))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn read(&self) -> RetrievalResult {
        let content = match fs::read(&self.store_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cache: Cache = serde_json::from_slice(&content)?;

        Ok(Some(CachedFeed {
            feed: cache.feed,
            timestamp: cache.timestamp,
        }))
    }

    fn write(&self, feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(parent) = self.store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(&Cache { feed, timestamp })?;

        let tmp_path = self.tmp_path();
        let written = fs::write(&tmp_path, json)
            .and_then(|()| fs::rename(&tmp_path, &self.store_path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.store_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .store_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| STORE_FILE_NAME.into());
        name.push(".tmp");
        self.store_path.with_file_name(name)
    }
}

impl FeedStore for JsonFeedStore {
    fn retrieve(&self, completion: RetrievalCompletion) {
        let result = self.read();
        debug!(
            path = %self.store_path.display(),
            found = matches!(result, Ok(Some(_))),
            "retrieved feed"
        );
        completion(result);
    }

    fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        let count = feed.len();
        let result = self.write(feed, timestamp);
        debug!(
            path = %self.store_path.display(),
            count,
            ok = result.is_ok(),
            "inserted feed"
        );
        completion(result);
    }

    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        let result = self.remove();
        debug!(path = %self.store_path.display(), ok = result.is_ok(), "deleted feed");
        completion(result);
    }
}
