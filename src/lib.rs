//! # folio-gateway
//!
//! A small API gateway backing a personal portfolio site. It proxies two
//! fixed upstreams (LastFM, Discord) and applies the cross-cutting HTTP
//! concerns the site needs: sliding-window rate limiting, request deadlines,
//! security response headers, CORS, and translation of upstream failures
//! into a stable JSON error contract.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use folio_gateway::{Config, server::server::HttpServer};
//!
//! #[tokio::main]
//! async fn main() -> folio_gateway::Result<()> {
//!     let config = Config::from_env()?;
//!     HttpServer::new(config)?.start().await
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
