//! Command-line interface parsing for feedcache
//!
//! This module handles parsing of CLI arguments using clap and resolves them
//! into the `AppConfig` the application runs with.

use std::path::PathBuf;

use chrono::Duration;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::cache::{CachePolicy, JsonFeedStore, MAX_CACHE_AGE_DAYS};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// No `--store` given and no home directory to derive a default from
    #[error("Could not determine a cache location; pass --store <PATH>")]
    NoStoreLocation,

    /// `--max-age-days` outside `1..=MAX_AGE_DAYS_LIMIT`
    #[error("Invalid max age: {0} days. The max age must be between 1 and 36500 days")]
    InvalidMaxAge(u32),
}

/// Largest accepted `--max-age-days`, a hundred years
pub const MAX_AGE_DAYS_LIMIT: u32 = 36_500;

/// feedcache - Fetch an image feed and keep the last good copy on disk
#[derive(Parser, Debug)]
#[command(name = "feedcache")]
#[command(about = "Fetch an image feed and serve it from a local cache")]
#[command(version)]
pub struct Cli {
    /// Path of the JSON cache file (defaults to the XDG cache directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Number of days a cached feed stays fresh
    #[arg(long, global = true, value_name = "DAYS", default_value_t = MAX_CACHE_AGE_DAYS as u32)]
    pub max_age_days: u32,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the feed
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the feed from URL and cache it, falling back to the cache when offline
    Fetch {
        /// Feed endpoint
        url: Url,
    },
    /// Print the cached feed if it is still fresh
    Show,
    /// Delete the cache if it is expired or unreadable
    Validate,
    /// Delete the cache
    Clear,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the JSON store keeps its document
    pub store_path: PathBuf,
    /// Freshness rule for the cached feed
    pub policy: CachePolicy,
    /// Default log level
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Creates an AppConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` with the resolved settings
    /// * `Err(CliError)` if the store location cannot be resolved or the
    ///   max age is outside `1..=MAX_AGE_DAYS_LIMIT`
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if !(1..=MAX_AGE_DAYS_LIMIT).contains(&cli.max_age_days) {
            return Err(CliError::InvalidMaxAge(cli.max_age_days));
        }

        let store_path = match &cli.store {
            Some(path) => path.clone(),
            None => JsonFeedStore::default_location().ok_or(CliError::NoStoreLocation)?,
        };

        Ok(AppConfig {
            store_path,
            policy: CachePolicy::with_max_age(Duration::days(i64::from(cli.max_age_days))),
            log_level: cli.log_level,
        })
    }
}
