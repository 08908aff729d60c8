//! External resource links.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::blocks::{strip_inline_markup, MarkdownIndex};
use super::scope::{find_scope, RESOURCE_HEADINGS};
use crate::document::Resource;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\]]+)\]\(([^)\s]+)(?:\s+"[^"]*")?\)"#).unwrap()
});
static BULLET_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[-*+]\s+\*\*([^*]+?)\*\*\s*:?\s*(https?://[^\s)>]+)").unwrap()
});

/// Collects external resource links.
///
/// Inside a "Resources"/"Links"/"References"/"See Also" section every link is
/// kept. Without such a section only links to a host in `domains` are kept.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::extract_resources;
///
/// let md = "Read [Dash Docs](https://dash.plotly.com/docs) or [Example](https://example.com).";
/// let resources = extract_resources(md, &["dash.plotly.com".to_string()]);
/// assert_eq!(resources.len(), 1);
/// assert_eq!(resources[0].name, "Dash Docs");
/// ```
pub fn extract_resources(markdown: &str, domains: &[String]) -> Vec<Resource> {
    resources_in(&MarkdownIndex::new(markdown), domains)
}

pub(crate) fn resources_in(index: &MarkdownIndex<'_>, domains: &[String]) -> Vec<Resource> {
    let mut seen = HashSet::new();
    let mut resources = Vec::new();

    let Some(scope) = find_scope(index, RESOURCE_HEADINGS) else {
        for (name, url) in links(index, 0..index.text.len()) {
            if is_allowed(&url, domains) && seen.insert(url.clone()) {
                resources.push(Resource { name, url });
            }
        }
        return resources;
    };

    for (name, url) in links(index, scope.range.clone()) {
        if seen.insert(url.clone()) {
            resources.push(Resource { name, url });
        }
    }

    let scope_text = index.slice(scope.range.clone());
    for caps in BULLET_LINK_RE.captures_iter(scope_text) {
        let Some(whole) = caps.get(0) else { continue };
        if index.in_fence(scope.range.start + whole.start()) {
            continue;
        }
        let url = caps[2].to_string();
        if seen.insert(url.clone()) {
            resources.push(Resource {
                name: caps[1].trim().trim_end_matches(':').trim().to_string(),
                url,
            });
        }
    }

    resources
}

/// Markdown `[text](url)` links starting inside `range`, skipping images and
/// anything inside a fence.
fn links(index: &MarkdownIndex<'_>, range: std::ops::Range<usize>) -> Vec<(String, String)> {
    let text = index.slice(range.clone());
    LINK_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if &caps[1] == "!" || index.in_fence(range.start + whole.start()) {
                return None;
            }
            Some((strip_inline_markup(caps[2].trim()), caps[3].to_string()))
        })
        .collect()
}

fn host(url: &str) -> Option<String> {
    let rest = url.split_once("://")?.1;
    let host = rest
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or("");
    let host = host.to_ascii_lowercase();
    Some(host.trim_start_matches("www.").to_string())
}

fn is_allowed(url: &str, domains: &[String]) -> bool {
    host(url).is_some_and(|h| {
        domains
            .iter()
            .any(|d| !d.is_empty() && h.contains(&d.to_ascii_lowercase()))
    })
}
