//! Short code snippets ("tips") not already owned by best practices or
//! patterns.

use super::blocks::{strip_inline_markup, strip_leading_number, MarkdownIndex};
use super::scope::ClaimedRanges;
use crate::document::CodeTip;

pub const TIP_MIN_LINES: usize = 2;
pub const TIP_MAX_LINES: usize = 15;

/// How far back from a snippet its heading may sit, in chars.
pub const CONTEXT_WINDOW: usize = 500;

/// Collects short code snippets that no scoped extractor has claimed.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::{extract_tips, ClaimedRanges};
///
/// let md = "### 2. **Quick** start\n```python\nimport dash\napp = dash.Dash()\n```\n";
/// let tips = extract_tips(md, &ClaimedRanges::new());
/// assert_eq!(tips[0].context.as_deref(), Some("Quick start"));
/// assert_eq!(tips[0].language, "python");
/// ```
pub fn extract_tips(markdown: &str, claimed: &ClaimedRanges) -> Vec<CodeTip> {
    tips_in(&MarkdownIndex::new(markdown), claimed)
}

pub(crate) fn tips_in(index: &MarkdownIndex<'_>, claimed: &ClaimedRanges) -> Vec<CodeTip> {
    index
        .fences
        .iter()
        .filter(|f| f.closed && !f.is_prose())
        .filter(|f| (TIP_MIN_LINES..=TIP_MAX_LINES).contains(&f.line_count()))
        .filter(|f| !claimed.contains(f.range.start))
        .map(|fence| {
            let start = fence.range.start;
            let context = index
                .headings
                .iter()
                .filter(|h| {
                    h.start < start && index.text[h.start..start].chars().count() <= CONTEXT_WINDOW
                })
                .last()
                .map(|h| clean_context(&h.title))
                .filter(|c| !c.is_empty());
            CodeTip {
                context,
                language: fence.language.clone(),
                code: fence.code.clone(),
            }
        })
        .collect()
}

fn clean_context(title: &str) -> String {
    strip_leading_number(strip_inline_markup(title).trim())
        .trim()
        .to_string()
}
