// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use std::collections::HashMap;
use std::time::Duration;

/// Collects metrics during a flood simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Count of calls by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of admitted calls by key
    admitted_per_key: HashMap<String, usize>,
    /// Count of calls by key
    requests_per_key: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    Throttled,
    Rejected,
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call outcome.
    pub fn record(&mut self, outcome: Outcome, key: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_key.entry(key.to_string()).or_insert(0) += 1;
        if outcome == Outcome::Allowed {
            *self.admitted_per_key.entry(key.to_string()).or_insert(0) += 1;
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total call count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of blocked to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let allowed = self.count(Outcome::Allowed);
        (total - allowed) as f64 / total as f64
    }

    /// Largest number of calls admitted for any single key.
    pub fn max_admitted_per_key(&self) -> usize {
        self.admitted_per_key.values().copied().max().unwrap_or(0)
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            allowed: self.count(Outcome::Allowed),
            throttled: self.count(Outcome::Throttled),
            rejected: self.count(Outcome::Rejected),
            block_rate: self.block_rate(),
            max_admitted_per_key: self.max_admitted_per_key(),
            median_latency_us: self.median_latency_us(),
            unique_keys: self.requests_per_key.len(),
        }
    }
}

/// Summary report of flood metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub allowed: usize,
    pub throttled: usize,
    pub rejected: usize,
    pub block_rate: f64,
    pub max_admitted_per_key: usize,
    pub median_latency_us: u64,
    pub unique_keys: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Metrics Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f, "Allowed:           {}", self.allowed)?;
        writeln!(f, "Throttled:         {}", self.throttled)?;
        writeln!(f, "Rejected:          {}", self.rejected)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f, "Max Admitted/Key:  {}", self.max_admitted_per_key)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        writeln!(f, "Unique Keys:       {}", self.unique_keys)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.record(Outcome::Allowed, "user-1", Duration::from_micros(100));
        metrics.record(Outcome::Allowed, "user-1", Duration::from_micros(150));
        metrics.record(Outcome::Throttled, "user-2", Duration::from_micros(50));

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.count(Outcome::Allowed), 2);
        assert_eq!(metrics.max_admitted_per_key(), 2);
        assert_eq!(metrics.report().unique_keys, 2);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Allowed, "k", Duration::ZERO);
        }
        for _ in 0..7 {
            metrics.record(Outcome::Throttled, "k", Duration::ZERO);
        }
        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
