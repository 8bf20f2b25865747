// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter keyed by caller identity.
//!
//! Each key owns a counter and a reset instant. The first call of a window
//! opens it; later calls increment the counter until it reaches the limit,
//! after which calls are denied (and not counted) until the window expires.
//!
//! The window is tumbling, not sliding: a caller may spend its full budget
//! at the end of one window and again at the start of the next, so up to
//! `2 * limit` calls can land in a short span around a boundary.

use crate::error::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Call admitted and counted
    Allowed {
        /// Remaining calls in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Call denied, not counted
    Limited {
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    /// Calls left in the window; zero once limited.
    pub fn remaining(&self) -> u32 {
        match self {
            RateLimitResult::Allowed { remaining, .. } => *remaining,
            RateLimitResult::Limited { .. } => 0,
        }
    }

    pub fn reset_in(&self) -> Duration {
        match self {
            RateLimitResult::Allowed { reset_in, .. } => *reset_in,
            RateLimitResult::Limited { retry_after } => *retry_after,
        }
    }

    /// Turn a denial into [`Error::Throttled`], yielding the remaining budget otherwise.
    pub fn into_result(self) -> Result<u32> {
        match self {
            RateLimitResult::Allowed { remaining, .. } => Ok(remaining),
            RateLimitResult::Limited { retry_after } => Err(Error::Throttled { retry_after }),
        }
    }
}

/// Counter state for one key.
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    /// Admitted calls in the current window
    count: u32,
    /// When the window expires
    reset_at: Instant,
}

/// Thread-safe fixed-window rate limiter.
///
/// The registry is sharded; the shard lock held by an entry reference makes
/// the read-check-increment for one key atomic, while keys on other shards
/// proceed independently.
#[derive(Debug, Default)]
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    /// Create an empty rate limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and count a call for `key` against `limit` calls per `window`.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> Result<RateLimitResult> {
        self.check_at(key, limit, window, Instant::now())
    }

    /// Same as [`RateLimiter::check`] with an explicit clock reading.
    pub fn check_at(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
        now: Instant,
    ) -> Result<RateLimitResult> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        if limit == 0 {
            return Err(Error::InvalidLimit);
        }
        if window.is_zero() {
            return Err(Error::InvalidWindow);
        }
        let next_reset = now.checked_add(window).ok_or(Error::InvalidWindow)?;

        let result = match self.entries.entry(key.to_owned()) {
            Entry::Vacant(vacant) => {
                vacant.insert(RateLimitEntry {
                    count: 1,
                    reset_at: next_reset,
                });
                debug!(key, limit, ?window, "Opened rate limit window");
                RateLimitResult::Allowed {
                    remaining: limit - 1,
                    reset_in: window,
                }
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if now > entry.reset_at {
                    *entry = RateLimitEntry {
                        count: 1,
                        reset_at: next_reset,
                    };
                    debug!(key, limit, ?window, "Rate limit window reset");
                    RateLimitResult::Allowed {
                        remaining: limit - 1,
                        reset_in: window,
                    }
                } else if entry.count >= limit {
                    let retry_after = entry.reset_at.saturating_duration_since(now);
                    debug!(key, ?retry_after, "Rate limit exceeded");
                    RateLimitResult::Limited { retry_after }
                } else {
                    entry.count += 1;
                    RateLimitResult::Allowed {
                        remaining: limit - entry.count,
                        reset_in: entry.reset_at.saturating_duration_since(now),
                    }
                }
            }
        };

        Ok(result)
    }

    /// Drop entries whose window has expired. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Same as [`RateLimiter::sweep_expired`] with an explicit clock reading.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.reset_at);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, tracked = self.entries.len(), "Swept expired rate limit entries");
        }
        removed
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
