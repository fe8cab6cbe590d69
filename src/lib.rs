//! feedcache library
//!
//! Remote feed loading, the local feed cache and the CLI wiring, exposed for
//! use in integration tests.

pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod feed;
pub mod logging;

pub use feed::{FeedImage, FeedLoader};
