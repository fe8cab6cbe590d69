//! feedcache - Fetch an image feed and keep the last good copy on disk
//!
//! Loads the feed from a remote endpoint, caches it as JSON and serves the
//! cache while it is fresh or when the network is unavailable.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use feedcache::app::{format_item, App, Outcome};
use feedcache::cli::{AppConfig, Cli};
use feedcache::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(config.log_level) {
        eprintln!("Warning: {}", e);
    }

    let app = App::new(&config);
    match app.run(&cli.command).await {
        Ok(Outcome::Feed { items, .. }) => {
            for item in &items {
                println!("{}", format_item(item));
            }
            ExitCode::SUCCESS
        }
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
