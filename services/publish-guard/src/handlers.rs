// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the publishing guard service.
//!
//! The service fronts two things: a throttle that costly actions (AI
//! suggestion generation) consult before running, and the Markdown pipeline
//! that turns post sources into sanitized preview and email HTML.

use crate::config::Config;
use crate::email::{
    build_email_shell, build_preview_shell, ensure_content_size, validate_unsubscribe_url,
};
use crate::error::Error;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics;
use crate::sanitizer::ContentSanitizer;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub sanitizer: ContentSanitizer,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            limiter: RateLimiter::new(),
            sanitizer: ContentSanitizer::new(),
            config,
        }
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/check", post(check))
        .route("/throttle", post(throttle))
        .route("/render", post(render))
        .route("/email", post(email));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics_text));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Error::Throttled { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            Error::InvalidKey | Error::InvalidLimit | Error::InvalidWindow => {
                (StatusCode::BAD_REQUEST, "INVALID_RATE_LIMIT")
            }
            Error::ContentTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "CONTENT_TOO_LARGE"),
            Error::InvalidUrl { .. } => (StatusCode::BAD_REQUEST, "INVALID_URL"),
            Error::Frontmatter(_) => (StatusCode::BAD_REQUEST, "INVALID_FRONTMATTER"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG"),
        };
        let retry_after_secs = self.retry_after().map(ceil_secs);
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code,
            retry_after_secs,
        });

        match retry_after_secs {
            Some(secs) => (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response(),
            None => (status, body).into_response(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Rate limit check request.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub key: String,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub window_ms: Option<u64>,
}

/// Rate limit check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_in_ms: u64,
    pub reset_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Throttled action request.
#[derive(Debug, Deserialize)]
pub struct ThrottleRequest {
    pub key: String,
}

/// Throttled action response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ThrottleResponse {
    pub remaining: u32,
}

/// Render request.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub markdown: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Render response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub html: String,
    pub size_bytes: usize,
}

/// Email build request.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub title: String,
    pub markdown: String,
    #[serde(default)]
    pub unsubscribe_url: Option<String>,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "publish-guard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Check and count a call against a key's budget.
///
/// Always answers 200 for a well-formed request so a fronting proxy can
/// read the decision from the body.
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, Error> {
    let limit = req.limit.unwrap_or(state.config.rate_limit.limit);
    let window = req
        .window_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| state.config.rate_limit.window_duration());

    debug!(key = %req.key, limit, ?window, "Processing rate limit check");

    let result = state.limiter.check(&req.key, limit, window)?;
    metrics::record_check(result.is_allowed());
    metrics::TRACKED_KEYS.set(state.limiter.len() as i64);

    let reason = match result {
        RateLimitResult::Allowed { .. } => None,
        RateLimitResult::Limited { retry_after } => {
            let message = Error::Throttled { retry_after }.to_string();
            info!(key = %req.key, retry_after_ms = retry_after.as_millis() as u64, "Request rate limited");
            Some(message)
        }
    };

    Ok(Json(CheckResponse {
        allowed: result.is_allowed(),
        remaining: result.remaining(),
        reset_in_ms: result.reset_in().as_millis() as u64,
        reset_at: reset_at(result.reset_in()),
        reason,
    }))
}

/// Gate a costly action with the configured budget.
pub async fn throttle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ThrottleRequest>,
) -> Result<Json<ThrottleResponse>, Error> {
    let budget = &state.config.rate_limit;
    let result = state
        .limiter
        .check(&req.key, budget.limit, budget.window_duration())?;
    metrics::record_check(result.is_allowed());
    metrics::TRACKED_KEYS.set(state.limiter.len() as i64);

    let remaining = result.into_result().inspect_err(|e| {
        info!(key = %req.key, error = %e, "Action throttled");
    })?;
    Ok(Json(ThrottleResponse { remaining }))
}

/// Render Markdown to sanitized HTML, optionally inside the preview shell.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, Error> {
    reject_oversized(&req.markdown)?;

    let body = state.sanitizer.render_document(&req.markdown);
    let html = match req.title.as_deref() {
        Some(title) => build_preview_shell(title, &body),
        None => body,
    };
    metrics::DOCUMENTS_RENDERED.inc();

    Ok(Json(RenderResponse {
        size_bytes: html.len(),
        html,
    }))
}

/// Build a newsletter email from Markdown.
pub async fn email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<RenderResponse>, Error> {
    reject_oversized(&req.markdown)?;

    let unsubscribe = req
        .unsubscribe_url
        .as_deref()
        .map(validate_unsubscribe_url)
        .transpose()?;

    let body = state.sanitizer.render_document(&req.markdown);
    metrics::DOCUMENTS_RENDERED.inc();

    let html = build_email_shell(&req.title, &body, unsubscribe.as_ref().map(|u| u.as_str()));
    let size_bytes = reject_oversized(&html)?;
    metrics::EMAILS_BUILT.inc();

    Ok(Json(RenderResponse { html, size_bytes }))
}

/// Prometheus text exposition.
pub async fn metrics_text() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather(),
    )
}

fn reject_oversized(content: &str) -> Result<usize, Error> {
    ensure_content_size(content).inspect_err(|e| {
        warn!(error = %e, "Rejected oversized content");
        metrics::CONTENT_REJECTED.inc();
    })
}

fn reset_at(reset_in: Duration) -> DateTime<Utc> {
    let delta = chrono::Duration::from_std(reset_in).unwrap_or(chrono::Duration::MAX);
    Utc::now()
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_millis().div_ceil(1000) as u64
}
