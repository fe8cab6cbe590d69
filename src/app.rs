//! Application wiring
//!
//! Builds the remote and local loaders from an `AppConfig` and runs one
//! CLI command against them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{HttpClient, RemoteFeedError, RemoteFeedLoader, ReqwestHttpClient};
use crate::cache::{delete_feed, JsonFeedStore, LocalFeedLoader, StoreError};
use crate::cli::{AppConfig, Command};
use crate::feed::FeedImage;

/// Errors surfaced to the user by a command
#[derive(Debug, Error)]
pub enum AppError {
    /// The remote feed failed and no fresh cache was available
    #[error("{0}")]
    Remote(#[from] RemoteFeedError),

    /// The cache could not be read or written
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Where the items of a command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Remote,
    Cache,
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Items to print
    Feed {
        source: FeedSource,
        items: Vec<FeedImage>,
    },
    /// The command only maintained the cache
    Done,
}

/// Main application state
pub struct App {
    store: Arc<JsonFeedStore>,
    local: Arc<LocalFeedLoader<JsonFeedStore>>,
    client: Arc<dyn HttpClient>,
}

impl App {
    /// Creates the application with a reqwest client and the system clock
    pub fn new(config: &AppConfig) -> Self {
        Self::with_parts(config, Arc::new(ReqwestHttpClient::new()), Utc::now)
    }

    /// Creates the application with a custom HTTP client and clock
    pub fn with_parts<C>(
        config: &AppConfig,
        client: Arc<dyn HttpClient>,
        current_date: C,
    ) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        let store = Arc::new(JsonFeedStore::new(config.store_path.clone()));
        let local =
            Arc::new(LocalFeedLoader::new(store.clone(), current_date).with_policy(config.policy));
        Self {
            store,
            local,
            client,
        }
    }

    /// Runs a single command
    pub async fn run(&self, command: &Command) -> Result<Outcome, AppError> {
        match command {
            Command::Fetch { url } => {
                let remote = RemoteFeedLoader::new(self.client.clone(), url.clone());
                self.fetch(&remote).await
            }
            Command::Show => {
                let items = self.local.load_feed().await?;
                Ok(Outcome::Feed {
                    source: FeedSource::Cache,
                    items,
                })
            }
            Command::Validate => {
                self.local.validate_cache();
                Ok(Outcome::Done)
            }
            Command::Clear => {
                delete_feed(self.store.as_ref()).await?;
                Ok(Outcome::Done)
            }
        }
    }

    /// Loads remotely and caches the result; serves the cache when offline
    async fn fetch(&self, remote: &RemoteFeedLoader) -> Result<Outcome, AppError> {
        match remote.fetch().await {
            Ok(items) => {
                if let Err(error) = self.local.save_feed(items.clone()).await {
                    warn!(%error, "could not cache the fetched feed");
                }
                Ok(Outcome::Feed {
                    source: FeedSource::Remote,
                    items,
                })
            }
            Err(remote_error) => match self.local.load_feed().await {
                Ok(items) if !items.is_empty() => {
                    info!(%remote_error, "remote feed unavailable, serving cache");
                    Ok(Outcome::Feed {
                        source: FeedSource::Cache,
                        items,
                    })
                }
                Ok(_) => Err(remote_error.into()),
                Err(store_error) => {
                    warn!(%store_error, "cache fallback failed");
                    Err(remote_error.into())
                }
            },
        }
    }
}

/// Formats one feed item as a tab-separated line
pub fn format_item(image: &FeedImage) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        image.id,
        image.url,
        image.description.as_deref().unwrap_or("-"),
        image.location.as_deref().unwrap_or("-"),
    )
}
