//! Bounded section scanner.
//!
//! Best practices, patterns and resources all live under a heading picked
//! from a small synonym set. The scope runs from the end of that heading to
//! the next heading of equal or shallower depth, ignoring headings inside
//! code fences.

use std::ops::Range;

use tracing::trace;

use super::blocks::MarkdownIndex;

pub const BEST_PRACTICE_HEADINGS: &[&str] = &[
    "best practices",
    "best practice",
    "guidelines",
    "recommendations",
];

pub const PATTERN_HEADINGS: &[&str] = &["patterns", "recipes"];

pub const RESOURCE_HEADINGS: &[&str] = &[
    "resources",
    "links",
    "references",
    "see also",
    "further reading",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    pub heading: String,
    pub level: u8,
    pub range: Range<usize>,
}

/// Finds the first heading whose title contains one of `synonyms` as a
/// whole-word phrase, case-insensitively.
pub fn find_scope(index: &MarkdownIndex<'_>, synonyms: &[&str]) -> Option<Scope> {
    let pos = index
        .headings
        .iter()
        .position(|h| title_matches(&h.title, synonyms))?;
    let heading = &index.headings[pos];
    let end = index.headings[pos + 1..]
        .iter()
        .find(|h| h.level <= heading.level)
        .map_or(index.text.len(), |h| h.start);

    trace!(heading = %heading.title, start = heading.end, end, "scope found");
    Some(Scope {
        heading: heading.title.clone(),
        level: heading.level,
        range: heading.end..end,
    })
}

fn title_matches(title: &str, synonyms: &[&str]) -> bool {
    let title = format!(" {} ", normalize(title));
    synonyms
        .iter()
        .any(|syn| title.contains(&format!(" {} ", normalize(syn))))
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte ranges already owned by a scoped extractor.
///
/// Tips skip any fence that starts inside one of these ranges so the same
/// snippet is never emitted twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimedRanges(Vec<Range<usize>>);

impl ClaimedRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, range: Range<usize>) {
        self.0.push(range);
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.0.iter().any(|r| r.contains(&offset))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
