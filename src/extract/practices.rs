//! Best-practice and pattern extraction.
//!
//! Both categories are scoped under a synonym heading (see [`super::scope`])
//! and split into items by the shallowest sub-headings one to three levels
//! below it.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::blocks::{
    collapse_whitespace, ellipsize, strip_inline_markup, MarkdownIndex,
};
use super::scope::{find_scope, Scope, BEST_PRACTICE_HEADINGS, PATTERN_HEADINGS};
use super::structure::classify_list_line;
use crate::document::{BestPractice, Pattern};

static NUMBERED_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]\s*(.+)$").unwrap());
static BOLD_LEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.+?)\*\*\s*[:.\-]?\s*(.*)$").unwrap());
static NUMBERED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s").unwrap());

pub const PRACTICE_DESCRIPTION_CHARS: usize = 200;
pub const PATTERN_DESCRIPTION_CHARS: usize = 150;
const PATTERN_CODE_BLOCKS: usize = 2;

/// Items found under a scoped heading, plus the scope they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Scoped<T> {
    pub items: Vec<T>,
    pub scope: Option<Scope>,
}

impl<T> Scoped<T> {
    fn empty() -> Self {
        Scoped {
            items: Vec::new(),
            scope: None,
        }
    }
}

struct Subsection {
    number: Option<usize>,
    title: String,
    body: Range<usize>,
}

/// Extracts numbered best-practice items from a "Best Practices"-like section.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::extract_best_practices;
///
/// let md = "## Best Practices\n### 3. Keep callbacks small\nSplit **large** callbacks.\n";
/// let practices = extract_best_practices(md);
/// assert_eq!(practices[0].number, 3);
/// assert_eq!(practices[0].title, "Keep callbacks small");
/// assert_eq!(practices[0].description, "Split large callbacks.");
/// ```
pub fn extract_best_practices(markdown: &str) -> Vec<BestPractice> {
    best_practices_in(&MarkdownIndex::new(markdown)).items
}

pub(crate) fn best_practices_in(index: &MarkdownIndex<'_>) -> Scoped<BestPractice> {
    let Some(scope) = find_scope(index, BEST_PRACTICE_HEADINGS) else {
        return Scoped::empty();
    };

    let subsections = subsections(index, &scope);
    let items = if subsections.is_empty() {
        practices_from_list(index, &scope)
    } else {
        subsections
            .into_iter()
            .enumerate()
            .map(|(i, sub)| {
                let fence = index.fences_in(sub.body.clone()).find(|f| f.closed);
                BestPractice {
                    number: sub.number.unwrap_or(i + 1),
                    title: sub.title,
                    description: description(index, sub.body, PRACTICE_DESCRIPTION_CHARS),
                    code: fence.map(|f| f.code.clone()),
                    code_lang: fence.map(|f| f.language.clone()),
                }
            })
            .collect()
    };

    Scoped {
        items,
        scope: Some(scope),
    }
}

/// Extracts named patterns, each with up to two non-prose code blocks.
pub fn extract_patterns(markdown: &str) -> Vec<Pattern> {
    patterns_in(&MarkdownIndex::new(markdown)).items
}

pub(crate) fn patterns_in(index: &MarkdownIndex<'_>) -> Scoped<Pattern> {
    let Some(scope) = find_scope(index, PATTERN_HEADINGS) else {
        return Scoped::empty();
    };

    let items = subsections(index, &scope)
        .into_iter()
        .map(|sub| Pattern {
            name: sub.title,
            description: description(index, sub.body.clone(), PATTERN_DESCRIPTION_CHARS),
            code_blocks: index
                .fences_in(sub.body)
                .filter(|f| f.closed && !f.is_prose())
                .take(PATTERN_CODE_BLOCKS)
                .map(|f| (f.language.clone(), f.code.clone()))
                .collect(),
        })
        .collect();

    Scoped {
        items,
        scope: Some(scope),
    }
}

fn subsections(index: &MarkdownIndex<'_>, scope: &Scope) -> Vec<Subsection> {
    let nested: Vec<_> = index
        .headings_in(scope.range.clone())
        .filter(|h| h.level > scope.level && h.level <= scope.level + 3)
        .collect();
    let Some(item_level) = nested.iter().map(|h| h.level).min() else {
        return Vec::new();
    };

    let items: Vec<_> = nested.iter().filter(|h| h.level == item_level).collect();
    items
        .iter()
        .map(|heading| {
            let end = index
                .headings_in(heading.end..scope.range.end)
                .find(|h| h.level <= item_level)
                .map_or(scope.range.end, |h| h.start);
            let (number, title) = split_number(&heading.title);
            Subsection {
                number,
                title,
                body: heading.end..end,
            }
        })
        .collect()
}

fn split_number(title: &str) -> (Option<usize>, String) {
    match NUMBERED_TITLE_RE.captures(title) {
        Some(caps) => (
            caps[1].parse().ok(),
            strip_inline_markup(caps[2].trim()),
        ),
        None => (None, strip_inline_markup(title)),
    }
}

/// First prose paragraph before any code fence, markup stripped.
fn description(index: &MarkdownIndex<'_>, body: Range<usize>, max_chars: usize) -> String {
    let prose_end = index
        .fences_in(body.clone())
        .map(|f| f.range.start)
        .next()
        .unwrap_or(body.end);

    let mut paragraph: Vec<&str> = Vec::new();
    for line in index.prose_lines(body.start..prose_end) {
        let text = line.text.trim();
        if text.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        if text.starts_with('#') || text.starts_with(".. ") || text.starts_with(':') {
            continue;
        }
        paragraph.push(text);
    }

    ellipsize(
        &collapse_whitespace(&strip_inline_markup(&paragraph.join(" "))),
        max_chars,
    )
}

/// Best practices written as a plain list directly under the heading.
fn practices_from_list(index: &MarkdownIndex<'_>, scope: &Scope) -> Vec<BestPractice> {
    index
        .prose_lines(scope.range.clone())
        .filter(|line| !line.text.starts_with(char::is_whitespace))
        .filter_map(|line| {
            let (_, text) = classify_list_line(line.text)?;
            let number = NUMBERED_ITEM_RE
                .captures(line.text)
                .and_then(|caps| caps[1].parse().ok());
            Some((number, text))
        })
        .enumerate()
        .map(|(i, (number, text))| {
            let (title, description) = split_list_item(&text);
            BestPractice {
                number: number.unwrap_or(i + 1),
                title,
                description: ellipsize(&description, PRACTICE_DESCRIPTION_CHARS),
                code: None,
                code_lang: None,
            }
        })
        .collect()
}

fn split_list_item(text: &str) -> (String, String) {
    if let Some(caps) = BOLD_LEAD_RE.captures(text) {
        return (
            strip_inline_markup(caps[1].trim_end_matches(':').trim()),
            collapse_whitespace(&strip_inline_markup(&caps[2])),
        );
    }
    let clean = collapse_whitespace(&strip_inline_markup(text));
    match clean.split_once(": ") {
        Some((title, rest)) => (title.trim().to_string(), rest.trim().to_string()),
        None => (clean, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
## Overview
Intro text.

## Best Practices

### 1. Use `prevent_initial_call`
Avoid firing callbacks on page load.

```python
@callback(Output('a', 'children'), Input('b', 'n_clicks'), prevent_initial_call=True)
def update(n):
    return n
```

### Cache expensive work
Use **memoization** for heavy computations.

#### Detail
Nested detail.

## Common Patterns

### Chained callbacks
One callback feeds another.

```markdown
not code
```

```python
a = 1
```

```python
b = 2
```

```python
c = 3
```

## Next
";

    #[test]
    fn test_best_practices_numbering_and_code() {
        let practices = extract_best_practices(DOC);
        assert_eq!(practices.len(), 2);
        assert_eq!(practices[0].number, 1);
        assert_eq!(practices[0].title, "Use prevent_initial_call");
        assert_eq!(practices[0].description, "Avoid firing callbacks on page load.");
        assert_eq!(practices[0].code_lang.as_deref(), Some("python"));
        assert!(practices[0].code.as_deref().unwrap().contains("def update"));
        assert_eq!(practices[1].number, 2);
        assert_eq!(practices[1].description, "Use memoization for heavy computations.");
        assert!(practices[1].code.is_none());
    }

    #[test]
    fn test_patterns_skip_prose_blocks_and_cap_code() {
        let patterns = extract_patterns(DOC);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].name, "Chained callbacks");
        assert_eq!(
            patterns[0].code_blocks,
            vec![
                ("python".to_string(), "a = 1".to_string()),
                ("python".to_string(), "b = 2".to_string())
            ]
        );
    }

    #[test]
    fn test_scoped_range_is_reported() {
        let index = MarkdownIndex::new(DOC);
        let scoped = best_practices_in(&index);
        let scope = scoped.scope.unwrap();
        assert!(DOC[scope.range].contains("memoization"));
    }

    #[test]
    fn test_practices_from_plain_list() {
        let md = "## Guidelines\n1. **Name IDs clearly**: use descriptive ids\n2. Keep layouts flat\n  - nested aside\n";
        let practices = extract_best_practices(md);
        assert_eq!(practices.len(), 2);
        assert_eq!(practices[0].title, "Name IDs clearly");
        assert_eq!(practices[0].description, "use descriptive ids");
        assert_eq!(practices[1].number, 2);
        assert_eq!(practices[1].title, "Keep layouts flat");
    }

    #[test]
    fn test_no_scope_means_nothing() {
        assert!(extract_best_practices("## Intro\ntext").is_empty());
        assert!(extract_patterns("## Pattern-Matching Callbacks\n### A\n").is_empty());
    }

    #[test]
    fn test_long_description_is_truncated() {
        let long = "word ".repeat(100);
        let md = format!("## Patterns\n### Big\n{}\n", long);
        let patterns = extract_patterns(&md);
        assert!(patterns[0].description.ends_with("..."));
        assert!(patterns[0].description.chars().count() <= PATTERN_DESCRIPTION_CHARS + 3);
    }
}
