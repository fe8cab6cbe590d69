//! Remote feed loader
//!
//! Fetches the feed from a URL through an `HttpClient` and maps the payload
//! into domain `FeedImage`s.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::http_client::HttpClient;
use super::mapper::FeedItemsMapper;
use crate::feed::{FeedImage, FeedLoader};

/// Errors that can occur when loading the remote feed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFeedError {
    /// The server could not be reached
    #[error("Could not reach the feed server")]
    Connectivity,

    /// The server answered with a non-200 status or an undecodable body
    #[error("Feed server returned invalid data")]
    InvalidData,
}

/// Loads the feed from a remote endpoint
#[derive(Clone)]
pub struct RemoteFeedLoader {
    client: Arc<dyn HttpClient>,
    url: Url,
}

impl RemoteFeedLoader {
    pub fn new(client: Arc<dyn HttpClient>, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and decode the feed
    pub async fn fetch(&self) -> Result<Vec<FeedImage>, RemoteFeedError> {
        let response = match self.client.get(&self.url).await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %self.url, %error, "feed request failed");
                return Err(RemoteFeedError::Connectivity);
            }
        };

        let items = FeedItemsMapper::map(&response.body, response.status).inspect_err(|_| {
            warn!(url = %self.url, status = response.status, "feed response rejected");
        })?;
        debug!(url = %self.url, count = items.len(), "fetched remote feed");

        Ok(items.into_iter().map(FeedImage::from).collect())
    }
}

#[async_trait]
impl FeedLoader for RemoteFeedLoader {
    type Error = RemoteFeedError;

    async fn load(&self) -> Result<Vec<FeedImage>, RemoteFeedError> {
        self.fetch().await
    }
}
