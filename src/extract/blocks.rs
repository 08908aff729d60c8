//! Shared line, fence and heading index over one markdown string.
//!
//! Every extractor reads the same [`MarkdownIndex`]. Fences are scanned
//! once and headings inside fences never count.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").unwrap());
static INLINE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());

/// One physical line with its byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSpan<'a> {
    pub start: usize,
    /// Offset of the following line (past the newline).
    pub next: usize,
    pub text: &'a str,
}

/// Splits `markdown` into lines, keeping byte offsets and dropping `\r\n`.
pub fn line_spans(markdown: &str) -> Vec<LineSpan<'_>> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for raw in markdown.split_inclusive('\n') {
        let text = raw.trim_end_matches('\n').trim_end_matches('\r');
        spans.push(LineSpan {
            start: offset,
            next: offset + raw.len(),
            text,
        });
        offset += raw.len();
    }
    spans
}

/// A fenced (```) code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeFence {
    /// Opening fence line through the closing fence line.
    pub range: Range<usize>,
    pub language: String,
    pub code: String,
    pub closed: bool,
}

impl CodeFence {
    pub fn contains(&self, offset: usize) -> bool {
        self.range.contains(&offset)
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }

    /// Markdown and plain-text blocks are prose, not code.
    pub fn is_prose(&self) -> bool {
        is_prose_language(&self.language)
    }
}

pub fn is_prose_language(lang: &str) -> bool {
    matches!(
        lang,
        "" | "markdown" | "md" | "text" | "txt" | "plaintext" | "plain"
    )
}

pub fn scan_fences(markdown: &str) -> Vec<CodeFence> {
    let lines = line_spans(markdown);
    let mut fences = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(info) = lines[i].text.trim_start().strip_prefix("```") else {
            i += 1;
            continue;
        };
        let language = info
            .split_whitespace()
            .next()
            .map(|l| l.trim_matches(|c| c == '{' || c == '}').to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "text".to_string());

        let start = lines[i].start;
        let mut j = i + 1;
        while j < lines.len() && !is_closing_fence(lines[j].text) {
            j += 1;
        }
        let closed = j < lines.len();
        let body: Vec<&str> = lines[i + 1..j.min(lines.len())]
            .iter()
            .map(|l| l.text)
            .collect();
        let end = if closed { lines[j].next } else { markdown.len() };

        fences.push(CodeFence {
            range: start..end,
            language,
            code: trim_blank_lines(&body.join("\n")),
            closed,
        });
        i = j + 1;
    }

    fences
}

fn is_closing_fence(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("```")
        .is_some_and(|rest| rest.trim_start_matches('`').trim().is_empty())
}

/// Drops leading and trailing blank lines, keeping indentation intact.
fn trim_blank_lines(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(a), Some(b)) => lines[a..=b].join("\n"),
        _ => String::new(),
    }
}

/// An ATX heading that is not inside a code fence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    /// Title with inline code spans unwrapped.
    pub title: String,
    pub start: usize,
    /// Offset just past the heading line.
    pub end: usize,
}

/// Shared, precomputed view of one markdown document.
///
/// Fences are located once, and every heading lookup already excludes
/// headings that sit inside a fence.
#[derive(Clone, Debug)]
pub struct MarkdownIndex<'a> {
    pub text: &'a str,
    pub lines: Vec<LineSpan<'a>>,
    pub fences: Vec<CodeFence>,
    pub headings: Vec<Heading>,
}

impl<'a> MarkdownIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines = line_spans(text);
        let fences = scan_fences(text);
        let headings = lines
            .iter()
            .filter(|line| !fences.iter().any(|f| f.contains(line.start)))
            .filter_map(|line| {
                let caps = HEADING_RE.captures(line.text)?;
                Some(Heading {
                    level: caps[1].len() as u8,
                    title: unwrap_inline_code(caps[2].trim()),
                    start: line.start,
                    end: line.next,
                })
            })
            .collect();

        MarkdownIndex {
            text,
            lines,
            fences,
            headings,
        }
    }

    pub fn in_fence(&self, offset: usize) -> bool {
        self.fences.iter().any(|f| f.contains(offset))
    }

    /// Fences starting inside `range`.
    pub fn fences_in(&self, range: Range<usize>) -> impl Iterator<Item = &CodeFence> {
        self.fences
            .iter()
            .filter(move |f| range.contains(&f.range.start))
    }

    /// Headings starting inside `range`.
    pub fn headings_in(&self, range: Range<usize>) -> impl Iterator<Item = &Heading> {
        self.headings
            .iter()
            .filter(move |h| range.contains(&h.start))
    }

    /// Lines starting inside `range` that are outside every fence.
    pub fn prose_lines(&self, range: Range<usize>) -> impl Iterator<Item = &LineSpan<'a>> {
        self.lines
            .iter()
            .filter(move |l| range.contains(&l.start) && !self.in_fence(l.start))
    }

    pub fn slice(&self, range: Range<usize>) -> &'a str {
        &self.text[range]
    }
}

pub fn unwrap_inline_code(text: &str) -> String {
    INLINE_CODE_RE.replace_all(text, "$1").into_owned()
}

/// Removes bold, inline code and link markup, keeping the visible text.
pub fn strip_inline_markup(text: &str) -> String {
    let text = INLINE_LINK_RE.replace_all(text, "$1");
    let text = BOLD_RE.replace_all(&text, "$1$2");
    INLINE_CODE_RE.replace_all(&text, "$1").into_owned()
}

pub fn strip_leading_number(text: &str) -> &str {
    match LEADING_NUMBER_RE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hard cut at `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First `max` characters followed by `...` when the text is longer.
pub fn ellipsize(text: &str, max: usize) -> String {
    let cut = truncate_chars(text, max);
    if cut.len() < text.len() {
        format!("{}...", cut.trim_end())
    } else {
        text.to_string()
    }
}
