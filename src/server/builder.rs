//! Server entry point with automatic configuration loading

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use tracing::info;

/// Load configuration from the environment and run the server
pub async fn run_server() -> Result<()> {
    info!("Starting {} v{}", crate::NAME, crate::VERSION);

    let config = Config::from_env()?;
    let server = HttpServer::new(config)?;

    info!("API endpoints:");
    info!("   GET  /                  - Service banner");
    info!("   GET  /health            - Health check");
    info!("   GET  /lastfm/recent     - Recently played tracks");
    info!("   GET  /lastfm/top-tracks - Top tracks");
    info!("   GET  /discord/profile   - Discord profile");

    server.start().await
}
