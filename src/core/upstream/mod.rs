//! Upstream API clients
//!
//! One module per third-party integration. Each client owns the wire types,
//! the normalization of the upstream's loosely-typed JSON into the stable
//! contract the site consumes, and the translation of upstream failures.

pub mod discord;
pub mod lastfm;

pub use discord::{DiscordClient, DiscordProfile};
pub use lastfm::{LastfmClient, RecentTrack, RecentTracks, TopTrack, TopTracks};
