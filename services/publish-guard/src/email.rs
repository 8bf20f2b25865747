// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Presentation shells for sanitized post bodies, and the outbound size guard.
//!
//! The body passed to a shell must already be sanitized; it is inserted
//! verbatim. Titles and URLs are escaped here since they never pass
//! through the sanitizer.

use crate::error::{Error, Result};
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Largest content accepted for the outbound email pipeline (100 KB).
pub const MAX_CONTENT_BYTES: usize = 102_400;

const EMAIL_STYLE: &str = r#"  <style>
    body { margin: 0; padding: 0; background-color: #0a0a0a; color: #e5e5e5; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }
    .container { max-width: 600px; margin: 0 auto; padding: 32px 24px; }
    .header { border-bottom: 1px solid #262626; padding-bottom: 24px; margin-bottom: 32px; }
    .header h1 { color: #ffffff; font-size: 28px; margin: 0; }
    .content { line-height: 1.7; font-size: 16px; }
    .content h1, .content h2, .content h3 { color: #ffffff; }
    .content a { color: #60a5fa; }
    .content code { background: #1e1e1e; padding: 2px 6px; border-radius: 4px; font-size: 14px; }
    .content pre { background: #1e1e1e; padding: 16px; border-radius: 8px; overflow-x: auto; }
    .content blockquote { border-left: 3px solid #404040; margin-left: 0; padding-left: 16px; color: #a3a3a3; }
    .content img { max-width: 100%; height: auto; border-radius: 8px; }
    .footer { border-top: 1px solid #262626; margin-top: 48px; padding-top: 24px; text-align: center; color: #737373; font-size: 13px; }
    .footer a { color: #737373; }
  </style>
"#;

/// Wrap a sanitized body in the dark-themed newsletter document.
///
/// Without an unsubscribe URL (test sends) the footer carries a notice
/// instead of a link.
pub fn build_email_shell(title: &str, safe_body_html: &str, unsubscribe_url: Option<&str>) -> String {
    let title = escape_html(title);
    let mut doc = String::with_capacity(EMAIL_STYLE.len() + safe_body_html.len() + 1024);

    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("  <meta charset=\"UTF-8\">\n");
    doc.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    doc.push_str(&format!("  <title>{title}</title>\n"));
    doc.push_str(EMAIL_STYLE);
    doc.push_str("</head>\n<body>\n  <div class=\"container\">\n");
    doc.push_str(&format!(
        "    <div class=\"header\">\n      <h1>{title}</h1>\n    </div>\n"
    ));
    doc.push_str(&format!(
        "    <div class=\"content\">\n      {safe_body_html}\n    </div>\n"
    ));
    doc.push_str("    <div class=\"footer\">\n");
    match unsubscribe_url {
        Some(url) => {
            doc.push_str("      <p>You received this because you subscribed to our newsletter.</p>\n");
            doc.push_str(&format!(
                "      <p><a href=\"{}\">Unsubscribe</a></p>\n",
                escape_html(url)
            ));
        }
        None => {
            doc.push_str("      <p>This is a test email. No unsubscribe link.</p>\n");
        }
    }
    doc.push_str("    </div>\n  </div>\n</body>\n</html>");

    debug!(bytes = doc.len(), with_unsubscribe = unsubscribe_url.is_some(), "Built email shell");
    doc
}

/// Wrap a sanitized body for the in-app web preview.
pub fn build_preview_shell(title: &str, safe_body_html: &str) -> String {
    format!(
        "<article class=\"post-preview\">\n  <h1>{}</h1>\n  <div class=\"post-body\">\n{}\n  </div>\n</article>",
        escape_html(title),
        safe_body_html
    )
}

/// Accept only absolute http(s) URLs with a host.
pub fn validate_unsubscribe_url(url: &str) -> Result<Url> {
    let invalid = || Error::InvalidUrl {
        param: "unsubscribe_url",
        url: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        debug!(url = %url, "Invalid unsubscribe URL (bad scheme or no host)");
        return Err(invalid());
    }
    Ok(parsed)
}

/// Size report for a piece of outbound content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentSize {
    pub valid: bool,
    pub size_bytes: usize,
}

/// Report the UTF-8 size of `content` against [`MAX_CONTENT_BYTES`].
pub fn validate_content_size(content: &str) -> ContentSize {
    let size_bytes = content.len();
    ContentSize {
        valid: size_bytes <= MAX_CONTENT_BYTES,
        size_bytes,
    }
}

/// [`validate_content_size`] as a `Result`, for callers that reject oversized content.
pub fn ensure_content_size(content: &str) -> Result<usize> {
    let report = validate_content_size(content);
    if report.valid {
        Ok(report.size_bytes)
    } else {
        Err(Error::ContentTooLarge {
            size: report.size_bytes,
            max: MAX_CONTENT_BYTES,
        })
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
