//! Sections, tables and lists.

use std::sync::LazyLock;

use regex::Regex;

use super::blocks::{LineSpan, MarkdownIndex};
use super::directives::directives_in;
use crate::document::{DirectiveInfo, ListInfo, ListKind, Section, TableInfo};

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.+)$").unwrap());
static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+(.+)$").unwrap());

/// Splits markdown into sections at every level 2-6 heading.
///
/// Text before the first such heading belongs to no section.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::extract_sections;
///
/// let sections = extract_sections("# Page\nintro\n## Setup\nInstall it.\n### `pip`\nRun pip.\n");
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].title, "Setup");
/// assert_eq!(sections[0].content, "Install it.");
/// assert_eq!(sections[1].title, "pip");
/// assert_eq!(sections[1].level, 3);
/// ```
pub fn extract_sections(markdown: &str) -> Vec<Section> {
    let index = MarkdownIndex::new(markdown);
    let directives = directives_in(&index);
    sections_in(&index, &directives)
}

pub(crate) fn sections_in(index: &MarkdownIndex<'_>, directives: &[DirectiveInfo]) -> Vec<Section> {
    index
        .headings
        .iter()
        .enumerate()
        .filter(|(_, h)| h.level >= 2)
        .map(|(i, heading)| {
            let end = index
                .headings
                .get(i + 1)
                .map_or(index.text.len(), |next| next.start);
            let body = heading.end..end;
            Section {
                level: heading.level,
                title: heading.title.clone(),
                content: index.slice(body.clone()).trim().to_string(),
                directives: directives
                    .iter()
                    .filter(|d| body.contains(&d.offset))
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}

/// Extracts pipe tables: header row, separator row, then one or more data rows.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::extract_tables;
///
/// let tables = extract_tables("| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n");
/// assert_eq!(tables[0].headers, vec!["A", "B"]);
/// assert_eq!(tables[0].rows, vec![vec!["1", "2"], vec!["3", "4"]]);
/// ```
pub fn extract_tables(markdown: &str) -> Vec<TableInfo> {
    tables_in(&MarkdownIndex::new(markdown))
}

pub(crate) fn tables_in(index: &MarkdownIndex<'_>) -> Vec<TableInfo> {
    let lines: Vec<&LineSpan<'_>> = index.prose_lines(0..index.text.len()).collect();
    let mut tables = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let is_start = i + 2 < lines.len()
            && is_table_row(lines[i].text)
            && is_separator_row(lines[i + 1].text)
            && is_table_row(lines[i + 2].text)
            && contiguous(&lines[i..i + 3]);
        if !is_start {
            i += 1;
            continue;
        }

        let headers = split_cells(lines[i].text);
        let mut rows = Vec::new();
        let mut j = i + 2;
        while j < lines.len() && is_table_row(lines[j].text) && contiguous(&lines[j - 1..=j]) {
            let mut cells = split_cells(lines[j].text);
            cells.resize(headers.len(), String::new());
            rows.push(cells);
            j += 1;
        }

        if headers.iter().any(|h| !h.is_empty()) {
            tables.push(TableInfo { headers, rows });
        }
        i = j;
    }

    tables
}

/// Consecutive prose lines are only adjacent if no fence sits between them.
fn contiguous(lines: &[&LineSpan<'_>]) -> bool {
    lines.windows(2).all(|w| w[0].next == w[1].start)
}

fn is_table_row(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    is_table_row(line)
        && line.contains('-')
        && line
            .trim()
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|') || c.is_whitespace())
}

fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

/// Groups contiguous bullet (`-`, `*`, `+`) or numbered (`N.`) lines into lists.
///
/// A blank line, any other line, or a switch between bullet and numbered
/// items ends the current list.
pub fn extract_lists(markdown: &str) -> Vec<ListInfo> {
    lists_in(&MarkdownIndex::new(markdown))
}

pub(crate) fn lists_in(index: &MarkdownIndex<'_>) -> Vec<ListInfo> {
    let mut lists = Vec::new();
    let mut current: Option<ListInfo> = None;

    for line in &index.lines {
        let item = if index.in_fence(line.start) {
            None
        } else {
            classify_list_line(line.text)
        };

        match item {
            Some((kind, text)) => match current.as_mut() {
                Some(list) if list.list_type == kind => list.items.push(text),
                _ => {
                    lists.extend(current.take());
                    current = Some(ListInfo {
                        list_type: kind,
                        items: vec![text],
                    });
                }
            },
            None => lists.extend(current.take()),
        }
    }
    lists.extend(current);

    lists
}

pub(crate) fn classify_list_line(line: &str) -> Option<(ListKind, String)> {
    if let Some(caps) = BULLET_RE.captures(line) {
        return Some((ListKind::Unordered, caps[1].trim().to_string()));
    }
    ORDERED_RE
        .captures(line)
        .map(|caps| (ListKind::Ordered, caps[1].trim().to_string()))
}
