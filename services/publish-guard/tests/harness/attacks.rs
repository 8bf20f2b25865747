// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Flood patterns for throttle testing.

use std::time::Duration;

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of calls to send
    pub total_requests: usize,
    /// Calls per second on the simulated clock
    pub requests_per_second: f64,
    /// Number of distinct caller identities
    pub unique_keys: usize,
    /// Calls admitted per key per window
    pub limit: u32,
    /// Window length
    pub window: Duration,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            requests_per_second: 10.0,
            unique_keys: 1,
            limit: 5,
            window: Duration::from_secs(3600),
        }
    }
}

/// Predefined flood patterns.
impl AttackConfig {
    /// One user hammering the suggestion endpoint.
    pub fn single_user_flood() -> Self {
        Self {
            total_requests: 500,
            requests_per_second: 100.0,
            ..Default::default()
        }
    }

    /// Many users, each sending a few calls.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 1000,
            requests_per_second: 200.0,
            unique_keys: 100,
            ..Default::default()
        }
    }

    /// Calls spread across several short windows.
    pub fn multi_window_flood() -> Self {
        Self {
            total_requests: 400,
            requests_per_second: 20.0,
            limit: 10,
            window: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// One call per window, always under budget.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 50,
            requests_per_second: 0.5,
            limit: 1,
            window: Duration::from_secs(1),
            ..Default::default()
        }
    }

    /// Simulated time between consecutive calls.
    pub fn step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.requests_per_second)
    }

    /// Simulated span of the whole flood.
    pub fn expected_duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_requests as f64 / self.requests_per_second)
    }

    /// Upper bound on admitted calls: each key gets `limit` per window it touches.
    pub fn max_admitted(&self) -> usize {
        let windows =
            (self.expected_duration().as_secs_f64() / self.window.as_secs_f64()).floor() as usize + 1;
        (windows * self.limit as usize * self.unique_keys).min(self.total_requests)
    }
}
