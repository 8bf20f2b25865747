// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Markdown rendering for posts.
//!
//! Rendering is pure and deterministic. Raw HTML in the source is passed
//! through untouched, so the output of [`render_markdown`] is never safe to
//! display; use [`render_document`] for anything that leaves the process.

use crate::error::{Error, Result};
use crate::sanitizer;
use pulldown_cmark::{html, Alignment, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use tracing::debug;

const FRONTMATTER_FENCE: &str = "---";

/// Render Markdown (with tables and strikethrough) to unsanitized HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, with_cell_align_attributes(parser));
    out
}

/// Write table cells with an `align` attribute instead of an inline style,
/// which the sanitizer would strip.
fn with_cell_align_attributes<'a, I>(events: I) -> impl Iterator<Item = Event<'a>>
where
    I: Iterator<Item = Event<'a>>,
{
    let mut alignments: Vec<Alignment> = Vec::new();
    let mut in_head = false;
    let mut column = 0;

    events.map(move |event| match event {
        Event::Start(Tag::Table(aligns)) => {
            alignments = aligns.clone();
            Event::Start(Tag::Table(aligns))
        }
        Event::Start(Tag::TableHead) => {
            in_head = true;
            column = 0;
            Event::Start(Tag::TableHead)
        }
        Event::End(TagEnd::TableHead) => {
            in_head = false;
            Event::End(TagEnd::TableHead)
        }
        Event::Start(Tag::TableRow) => {
            column = 0;
            Event::Start(Tag::TableRow)
        }
        Event::Start(Tag::TableCell) => {
            let cell = if in_head { "th" } else { "td" };
            let align = match alignments.get(column) {
                Some(Alignment::Left) => " align=\"left\"",
                Some(Alignment::Center) => " align=\"center\"",
                Some(Alignment::Right) => " align=\"right\"",
                Some(Alignment::None) | None => "",
            };
            column += 1;
            Event::Html(format!("<{cell}{align}>").into())
        }
        Event::End(TagEnd::TableCell) => {
            Event::Html(if in_head { "</th>" } else { "</td>" }.into())
        }
        other => other,
    })
}

/// Render Markdown to HTML that only contains allowlisted constructs.
pub fn render_document(markdown: &str) -> String {
    sanitizer::sanitize(&render_markdown(markdown))
}

/// Metadata from a post's YAML frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostFrontmatter {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub hero_image: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub is_paid: bool,
    pub tags: Vec<String>,
}

/// A post split into frontmatter and Markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub frontmatter: PostFrontmatter,
    pub content: String,
}

impl Post {
    /// Sanitized HTML for the post body.
    pub fn render(&self) -> String {
        render_document(&self.content)
    }
}

/// Split a leading `---` YAML block from the Markdown body.
///
/// Input without a frontmatter block is returned whole as the content.
pub fn parse_post(raw: &str) -> Result<Post> {
    let Some((yaml, content)) = split_frontmatter(raw) else {
        return Ok(Post {
            frontmatter: PostFrontmatter::default(),
            content: raw.to_string(),
        });
    };

    let frontmatter = if yaml.trim().is_empty() {
        PostFrontmatter::default()
    } else {
        serde_yml::from_str(yaml).map_err(|e| {
            debug!(error = %e, "Frontmatter did not parse");
            Error::Frontmatter(e.to_string())
        })?
    };

    Ok(Post {
        frontmatter,
        content: content.to_string(),
    })
}

/// Returns `(yaml, body)` when `raw` opens with a fenced frontmatter block.
fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let first_end = raw.find('\n')?;
    if raw[..first_end].trim_end() != FRONTMATTER_FENCE {
        return None;
    }

    let rest = &raw[first_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONTMATTER_FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}
