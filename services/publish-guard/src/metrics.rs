// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the publishing guard.

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    pub static ref RATE_LIMIT_CHECKS: IntCounterVec = register_int_counter_vec!(
        "publish_guard_rate_limit_checks_total",
        "Rate limit checks by outcome",
        &["outcome"]
    )
    .expect("rate limit counter registers once");
    pub static ref DOCUMENTS_RENDERED: IntCounter = register_int_counter!(
        "publish_guard_documents_rendered_total",
        "Markdown documents rendered and sanitized"
    )
    .expect("render counter registers once");
    pub static ref EMAILS_BUILT: IntCounter = register_int_counter!(
        "publish_guard_emails_built_total",
        "Email documents built"
    )
    .expect("email counter registers once");
    pub static ref CONTENT_REJECTED: IntCounter = register_int_counter!(
        "publish_guard_content_rejected_total",
        "Requests rejected for exceeding the content size limit"
    )
    .expect("rejection counter registers once");
    pub static ref TRACKED_KEYS: IntGauge = register_int_gauge!(
        "publish_guard_tracked_keys",
        "Keys currently held by the rate limiter"
    )
    .expect("tracked keys gauge registers once");
}

/// Record the outcome of a rate limit check.
pub fn record_check(allowed: bool) {
    let outcome = if allowed { "allowed" } else { "limited" };
    RATE_LIMIT_CHECKS.with_label_values(&[outcome]).inc();
}

/// Render the default registry in the Prometheus text format.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}
