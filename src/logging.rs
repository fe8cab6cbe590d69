//! Logging setup for the feedcache binary

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingError(String);

/// Install a global tracing subscriber writing to stderr.
///
/// `level` is the default directive; `RUST_LOG` takes precedence when set.
pub fn init(level: LevelFilter) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|err| LoggingError(err.to_string()))
}
