// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Publishing Guard Service
//!
//! Exposes the action throttle and the Markdown sanitization pipeline over
//! HTTP for the dashboard and newsletter tooling.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT`: Calls per key per window (default: 5)
//! - `RATE_WINDOW_SECS`: Window length in seconds (default: 3600)
//! - `SWEEP_INTERVAL_SECS`: Expired-entry sweep interval (default: 60)
//! - `METRICS_ENABLED`: Serve Prometheus metrics (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use publish_guard::{
    config::Config,
    handlers::{router, AppState},
    metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        limit = config.rate_limit.limit,
        window_secs = config.rate_limit.window_secs,
        metrics = config.metrics.enabled,
        "Starting publishing guard"
    );

    let state = Arc::new(AppState::new(config.clone()));

    // Expired windows are never read again; drop them so the registry
    // tracks only live callers.
    let sweep_state = state.clone();
    let sweep_interval = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let removed = sweep_state.limiter.sweep_expired();
            metrics::TRACKED_KEYS.set(sweep_state.limiter.len() as i64);
            debug!(removed, "Rate limiter sweep complete");
        }
    });

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
