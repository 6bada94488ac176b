//! Core gateway functionality

pub mod rate_limiter;
pub mod upstream;
