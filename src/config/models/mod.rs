//! Configuration models

mod rate_limit;
mod server;
mod upstream;

pub use rate_limit::{RateLimitConfig, RateLimits};
pub use server::ServerConfig;
pub use upstream::{DiscordConfig, LastfmConfig};

use std::str::FromStr;

/// Read an environment variable, treating empty values as unset
pub(crate) fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, falling back on absence or parse failure
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_var(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
