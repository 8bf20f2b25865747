// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Allowlist HTML sanitizer.
//!
//! Only the tags, attributes and URL schemes listed here survive. Anything
//! else is dropped because it is absent from the lists: scripts, event
//! handlers and `style` are never matched against a blocklist.
//!
//! Disallowed tags are removed while their text is kept and their
//! descendants are filtered on their own, except `script` and `style`, whose
//! content is dropped with them.

use ammonia::{Builder, UrlRelative};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6",
    "p", "br", "hr",
    "ul", "ol", "li",
    "blockquote", "pre", "code",
    "a", "strong", "em", "del", "s",
    "img", "table", "thead", "tbody", "tr", "th", "td",
    "div", "span",
];

/// Attributes kept per tag. Tags not listed keep no attributes.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target", "rel"]),
    ("img", &["src", "alt", "title", "width", "height", "cid"]),
    ("code", &["class"]),
    ("pre", &["class"]),
    ("span", &["class"]),
    ("div", &["class"]),
    ("td", &["align"]),
    ("th", &["align"]),
];

/// Schemes permitted in URL-bearing attributes (`href`, `src`).
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "cid"];

/// Tags removed together with everything inside them.
const DROPPED_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Read-only view of the fixed allowlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allowlist;

impl Allowlist {
    pub fn allows_tag(&self, tag: &str) -> bool {
        ALLOWED_TAGS.contains(&tag)
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        ALLOWED_ATTRIBUTES
            .iter()
            .any(|(t, attrs)| *t == tag && attrs.contains(&attribute))
    }

    pub fn allows_scheme(&self, scheme: &str) -> bool {
        ALLOWED_URL_SCHEMES.contains(&scheme)
    }
}

/// HTML sanitizer over the fixed allowlist.
///
/// Holds no mutable state and can be shared freely across threads.
pub struct ContentSanitizer {
    builder: Builder<'static>,
}

impl ContentSanitizer {
    /// Build a sanitizer for the fixed allowlist.
    pub fn new() -> Self {
        let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = ALLOWED_ATTRIBUTES
            .iter()
            .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect()))
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            // `rel` is an author-controlled attribute here; ammonia must not also set it.
            .link_rel(None)
            .clean_content_tags(DROPPED_CONTENT_TAGS.iter().copied().collect())
            .strip_comments(true);

        Self { builder }
    }

    /// Filter arbitrary HTML down to the allowlist.
    pub fn sanitize(&self, html: &str) -> String {
        let safe = restore_pre_newlines(&self.builder.clean(html).to_string());
        trace!(input_len = html.len(), output_len = safe.len(), "Sanitized HTML");
        safe
    }

    /// Render Markdown and sanitize the result.
    pub fn render_document(&self, markdown: &str) -> String {
        self.sanitize(&crate::markdown::render_markdown(markdown))
    }
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContentSanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSanitizer")
            .field("tags", &ALLOWED_TAGS.len())
            .field("url_schemes", &ALLOWED_URL_SCHEMES)
            .finish()
    }
}

/// Double a newline that opens `<pre>` content.
///
/// The parser drops one newline directly after a `<pre>` start tag and the
/// serializer does not write it back, so without this each pass would eat
/// another leading newline.
fn restore_pre_newlines(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        // Serialized attribute values are double-quoted and may hold a raw `>`.
        let mut in_quotes = false;
        let end = rest.char_indices().find_map(|(i, c)| match c {
            '"' => {
                in_quotes = !in_quotes;
                None
            }
            '>' if !in_quotes => Some(i),
            _ => None,
        });
        let Some(end) = end else {
            break;
        };

        let tag = &rest[..=end];
        out.push_str(tag);
        rest = &rest[end + 1..];

        let name = tag[1..].split(|c: char| c.is_whitespace() || c == '>' || c == '/').next();
        if name == Some("pre") && rest.starts_with('\n') {
            out.push('\n');
        }
    }
    out.push_str(rest);
    out
}

lazy_static! {
    static ref SHARED: ContentSanitizer = ContentSanitizer::new();
}

/// Sanitize with the process-wide sanitizer.
pub fn sanitize(html: &str) -> String {
    SHARED.sanitize(html)
}
