//! Hashtag extraction and tag edge reconciliation
//!
//! Hashtags are links to `/search/hashtag/<Tag>` inside post content. After
//! every content write the post's TAGGED edges are made to match exactly the
//! set of hashtags found in the content.

use crate::context::RequestContext;
use crate::error::ApiResult;
use crate::relations;
use graph_store::{props, EdgeKind, Label, NodeRef, Properties};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Regex for hashtag anchors; the `class` attribute is optional
static HASHTAG_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\b[^>]*\bhref\s*=\s*["']/search/hashtag/([^"'?#/]+)["'][^>]*>"#)
        .expect("Invalid hashtag link regex")
});

/// A tag starts with a letter and continues with letters, digits or `_`
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}\p{N}_]*$").expect("Invalid tag regex"));

/// Extract hashtags from post content
///
/// Returns the decoded tag ids, deduplicated in order of first occurrence.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    HASHTAG_LINK_REGEX
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .filter_map(|m| urlencoding::decode(m.as_str()).ok())
        .map(|tag| tag.into_owned())
        .filter(|tag| TAG_REGEX.is_match(tag))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Make the post's TAGGED edges equal the hashtags in `content`
///
/// Tags still present keep their edge untouched, so resubmitting the same
/// content writes nothing.
pub async fn reconcile_tags(ctx: &RequestContext, post: &NodeRef, content: &str) -> ApiResult<()> {
    let wanted = extract_hashtags(content);
    let current: Vec<String> = ctx
        .store
        .related(post, &relations::post::TAGS)
        .await?
        .into_iter()
        .map(|related| related.node.id().to_string())
        .collect();

    for stale in current.iter().filter(|tag| !wanted.contains(tag)) {
        ctx.store
            .delete_edge(
                post,
                EdgeKind::Tagged,
                &NodeRef::new(Label::Tag, stale.as_str()),
                Properties::new(),
            )
            .await?;
    }

    for tag in wanted.iter().filter(|tag| !current.contains(tag)) {
        let node = ctx
            .store
            .merge_node(Label::Tag, tag, props! { "id" => tag.as_str() })
            .await?;
        ctx.store
            .merge_edge(post, EdgeKind::Tagged, &node.node_ref(), Properties::new())
            .await?;
    }

    debug!(post_id = %post.id, tags = ?wanted, "Reconciled tags");
    Ok(())
}
