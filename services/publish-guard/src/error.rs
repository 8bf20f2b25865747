// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the publishing guard.

use std::time::Duration;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Rate limit exceeded. Try again in {} minutes.", .retry_after.as_millis().div_ceil(60_000))]
    Throttled { retry_after: Duration },

    #[error("Rate limit key must not be empty")]
    InvalidKey,

    #[error("Rate limit must allow at least one call per window")]
    InvalidLimit,

    #[error("Rate limit window must be a positive, representable duration")]
    InvalidWindow,

    #[error("Content too large: {size} bytes exceeds the {max} byte limit")]
    ContentTooLarge { size: usize, max: usize },

    #[error("Invalid URL format for {param}: {url}")]
    InvalidUrl { param: &'static str, url: String },

    #[error("Invalid frontmatter: {0}")]
    Frontmatter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the caller was throttled and may retry later.
    pub fn is_throttled(&self) -> bool {
        matches!(self, Error::Throttled { .. })
    }

    /// Time until a throttled caller may retry.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::Throttled { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Whole minutes until retry, rounded up.
pub fn retry_minutes(retry_after: Duration) -> u128 {
    retry_after.as_millis().div_ceil(60_000)
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
