//! Decoding of the remote feed payload

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use super::remote_loader::RemoteFeedError;
use crate::feed::FeedImage;

/// The only status code that carries a usable feed
const OK_200: u16 = 200;

/// Top-level payload returned by the feed endpoint
#[derive(Debug, Deserialize)]
struct Root {
    items: Vec<RemoteFeedItem>,
}

/// A single item as the API sends it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFeedItem {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Image URL; the API calls this field `image`
    pub image: Url,
}

impl From<RemoteFeedItem> for FeedImage {
    fn from(item: RemoteFeedItem) -> Self {
        FeedImage {
            id: item.id,
            description: item.description,
            location: item.location,
            url: item.image,
        }
    }
}

pub struct FeedItemsMapper;

impl FeedItemsMapper {
    /// Decodes `body` into feed items if `status` is 200
    pub fn map(body: &[u8], status: u16) -> Result<Vec<RemoteFeedItem>, RemoteFeedError> {
        if status != OK_200 {
            return Err(RemoteFeedError::InvalidData);
        }
        let root: Root = serde_json::from_slice(body).map_err(|_| RemoteFeedError::InvalidData)?;
        Ok(root.items)
    }
}
