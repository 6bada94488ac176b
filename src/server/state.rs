//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::upstream::{DiscordClient, LastfmClient};
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every worker; the configuration is behind an Arc and the
/// upstream clients share one connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// LastFM upstream client
    pub lastfm: LastfmClient,
    /// Discord upstream client
    pub discord: DiscordClient,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Arc<Config>, lastfm: LastfmClient, discord: DiscordClient) -> Self {
        Self {
            config,
            lastfm,
            discord,
        }
    }
}
