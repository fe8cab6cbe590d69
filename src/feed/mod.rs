//! Core feed models
//!
//! This module contains the domain types shared by the remote and local
//! loaders: the `FeedImage` value and the `FeedLoader` abstraction.

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

/// A single entry in the image feed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedImage {
    /// Unique identifier for the image
    pub id: Uuid,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional human-readable location
    pub location: Option<String>,
    /// Where the image itself can be fetched
    pub url: Url,
}

impl FeedImage {
    /// Creates a new FeedImage
    pub fn new(
        id: Uuid,
        description: Option<String>,
        location: Option<String>,
        url: Url,
    ) -> Self {
        Self {
            id,
            description,
            location,
            url,
        }
    }
}

/// Anything that can produce the current feed
///
/// Implemented by the remote loader (HTTP) and by the local cache loader.
#[async_trait]
pub trait FeedLoader: Send + Sync {
    /// Error reported when the feed cannot be produced
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads the feed
    async fn load(&self) -> Result<Vec<FeedImage>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_images_compare_by_all_fields() {
        let id = Uuid::new_v4();
        let url = Url::parse("https://any-url.com/image.png").unwrap();
        let a = FeedImage::new(id, Some("a".into()), None, url.clone());
        let b = FeedImage::new(id, Some("a".into()), None, url.clone());
        let c = FeedImage::new(id, Some("a".into()), Some("somewhere".into()), url);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
