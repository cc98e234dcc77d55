//! Markup handling shared by posts, comments and users

use crate::context::RequestContext;
use crate::error::ApiResult;
use graph_store::{Label, NodeFilter};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Length of `contentExcerpt` before truncation
pub const EXCERPT_LENGTH: usize = 120;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

/// Plain text of an HTML fragment with collapsed whitespace
pub fn strip_markup(html: &str) -> String {
    let text = TAG_RE.replace_all(html, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

pub fn excerpt(html: &str) -> String {
    let text = strip_markup(html);
    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }
    let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
    format!("{}...", cut.trim_end())
}

pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// First free slug among `base`, `base-1`, `base-2`, ...
pub async fn unique_slug(ctx: &RequestContext, label: Label, text: &str) -> ApiResult<String> {
    let base = slugify(text);
    let mut candidate = base.clone();
    let mut suffix = 0;
    loop {
        let filter = NodeFilter::default().with("slug", Value::String(candidate.clone()));
        if ctx.store.find_nodes(label, &filter).await?.is_empty() {
            return Ok(candidate);
        }
        suffix += 1;
        candidate = format!("{}-{}", base, suffix);
    }
}
