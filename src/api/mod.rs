//! Remote feed API
//!
//! HTTP transport, payload mapping and the `RemoteFeedLoader`.

mod http_client;
mod mapper;
mod remote_loader;

pub use http_client::{HttpClient, HttpClientError, HttpResponse, ReqwestHttpClient};
pub use mapper::{FeedItemsMapper, RemoteFeedItem};
pub use remote_loader::{RemoteFeedError, RemoteFeedLoader};
