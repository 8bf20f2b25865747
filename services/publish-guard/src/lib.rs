// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Publishing Guard
//!
//! Trust-boundary utilities for the task dashboard and newsletter:
//!
//! - Per-user fixed-window throttling of costly actions (AI suggestions,
//!   5 per hour by default)
//! - Markdown rendering with an allowlist HTML sanitizer
//! - Email and preview shells around sanitized post bodies
//! - Outbound content size guard (100 KB)

pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod markdown;
pub mod metrics;
pub mod sanitizer;

pub use config::Config;
pub use email::{build_email_shell, validate_content_size, ContentSize, MAX_CONTENT_BYTES};
pub use error::{Error, Result};
pub use limiter::{RateLimitResult, RateLimiter};
pub use markdown::{parse_post, render_document, render_markdown, Post, PostFrontmatter};
pub use sanitizer::{sanitize, Allowlist, ContentSanitizer};
