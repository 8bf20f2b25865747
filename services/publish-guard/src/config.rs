// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the publishing guard service.
//!
//! Defaults match the AI-suggestion budget: five generations per user per
//! hour.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the publishing guard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Default throttling budget applied when a caller does not supply one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Calls admitted per key per window (default: 5)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often expired entries are swept, in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_limit() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults.
    ///
    /// - `BIND_ADDR`: Server bind address
    /// - `RATE_LIMIT`: Calls per key per window
    /// - `RATE_WINDOW_SECS`: Window length in seconds
    /// - `SWEEP_INTERVAL_SECS`: Expired-entry sweep interval in seconds
    /// - `METRICS_ENABLED`: `true` or `false`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(limit) = parse_var(&lookup, "RATE_LIMIT")? {
            config.rate_limit.limit = limit;
        }
        if let Some(secs) = parse_var(&lookup, "RATE_WINDOW_SECS")? {
            config.rate_limit.window_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "SWEEP_INTERVAL_SECS")? {
            config.rate_limit.sweep_interval_secs = secs;
        }
        if let Some(enabled) = parse_var(&lookup, "METRICS_ENABLED")? {
            config.metrics.enabled = enabled;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject budgets the limiter would refuse at request time.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.limit == 0 {
            return Err(Error::Config("RATE_LIMIT must be at least 1".to_string()));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(Error::Config(
                "RATE_WINDOW_SECS must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(Error::Config(
                "SWEEP_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        if !self.metrics.path.starts_with('/') {
            return Err(Error::Config(format!(
                "metrics path {:?} must start with '/'",
                self.metrics.path
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} has invalid value {raw:?}"))),
        None => Ok(None),
    }
}
