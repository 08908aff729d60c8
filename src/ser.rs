//! Documentation TOON serialization.
//!
//! This module turns an [`ExtractedDocument`] into the compact, line-oriented
//! TOON text served at `<page>/llms.toon`.
//!
//! ## Overview
//!
//! The serializer applies the format's space-saving rules:
//!
//! - **Counted headers**: list blocks start with `name[N]:` where `N` is the
//!   number of entries actually emitted after capping
//! - **Grouped directives**: targets are listed once per directive kind
//! - **Compressed bodies**: section prose and code are cut to fixed budgets
//! - **Quote minimization**: values are unquoted unless they contain a
//!   delimiter (see [`escape_toon_value`])
//!
//! Blocks are emitted in a fixed order and separated by blank lines. Empty
//! blocks are omitted entirely. Output depends only on the inputs, so two
//! calls with the same page produce byte-identical text.
//!
//! ## Usage
//!
//! ```rust
//! use docs_toon::{build_documentation_toon, extract_document, PageEntry, PageMeta, ToonOptions};
//!
//! let options = ToonOptions::default();
//! let doc = extract_document("## Install\nRun the installer before anything else, then restart.\n", &options);
//! let meta = PageMeta::new("/install", "Install");
//! let registry = vec![PageEntry::new("/install", "Install"), PageEntry::new("/faq", "FAQ")];
//!
//! let toon = build_documentation_toon(&meta, &doc, &registry, &options);
//! assert!(toon.starts_with("meta:\n  path: /install\n"));
//! assert!(toon.contains("relatedPages[1]:\n  FAQ: /faq"));
//! assert!(toon.ends_with("summary: Install: | 1 sections"));
//! ```

use indexmap::IndexMap;
use tracing::debug;

use crate::compress::{compress_code, compress_section_content};
use crate::document::{DirectiveInfo, DirectiveKind, ExtractedDocument, Section};
use crate::extract::blocks::{ellipsize, truncate_chars};
use crate::site::{PageMeta, PageRegistry};
use crate::ToonOptions;

/// Format tag written to the `meta` block.
pub const FORMAT_VERSION: &str = "toon/3.3";

const SNIPPET_MIN_CHARS: usize = 50;
const SNIPPET_INLINE_CHARS: usize = 100;
const SNIPPET_MAX_LINES: usize = 3;
const INLINE_TARGETS: usize = 3;

#[inline]
fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.contains(',')
        || s.contains(':')
        || s.contains('\n')
        || s.contains('\r')
        || s.contains('\t')
        || s.contains('"')
        || s.contains('\'')
}

/// Quotes a value when it contains a delimiter.
///
/// Values containing a comma, colon, quote or line break are wrapped in
/// double quotes, with `"` and `\` and control characters escaped. Empty
/// values become `""`. Everything else is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use docs_toon::escape_toon_value;
///
/// assert_eq!(escape_toon_value("plain"), "plain");
/// assert_eq!(escape_toon_value("a, b"), "\"a, b\"");
/// assert_eq!(escape_toon_value("say \"hi\""), "\"say \\\"hi\\\"\"");
/// assert_eq!(escape_toon_value(""), "\"\"");
/// ```
pub fn escape_toon_value(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Assembles the documentation TOON text for one page.
///
/// Every category is capped by the matching `max_*` field of `options`, and
/// each `name[N]:` header reports the capped count.
pub fn build_documentation_toon<R>(
    meta: &PageMeta,
    doc: &ExtractedDocument,
    registry: &R,
    options: &ToonOptions,
) -> String
where
    R: PageRegistry + ?Sized,
{
    let mut serializer = DocumentationSerializer::new(meta, options);
    serializer.write_meta();
    serializer.write_context(registry);
    serializer.write_document(doc);
    let output = serializer.into_inner();
    debug!(path = %meta.path, bytes = output.len(), "serialized documentation toon");
    output
}

/// Line-oriented writer for the documentation TOON format.
///
/// Tracks the emitted count of each category so the closing summary line
/// agrees with the block headers.
struct DocumentationSerializer<'a> {
    output: String,
    meta: &'a PageMeta,
    options: &'a ToonOptions,
    summary: Vec<String>,
    /// Directive usage and callback counts, which close the summary line.
    tail: Vec<String>,
}

impl<'a> DocumentationSerializer<'a> {
    fn new(meta: &'a PageMeta, options: &'a ToonOptions) -> Self {
        DocumentationSerializer {
            output: String::with_capacity(4096),
            meta,
            options,
            summary: Vec::new(),
            tail: Vec::new(),
        }
    }

    fn into_inner(mut self) -> String {
        let mut parts = vec![format!("{}:", self.meta.name)];
        parts.append(&mut self.summary);
        parts.append(&mut self.tail);
        self.output.push_str("summary: ");
        self.output.push_str(&parts.join(" | "));
        self.output
    }

    #[inline]
    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    #[inline]
    fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Writes each line of `code` under a `code: |` marker.
    fn write_code(&mut self, indent: &str, code: &str) {
        self.line(&format!("{}code: |", indent));
        for code_line in code.strip_suffix('\n').unwrap_or(code).split('\n') {
            self.line(&format!("{}  {}", indent, code_line));
        }
    }

    fn write_meta(&mut self) {
        let meta = self.meta;
        self.line("meta:");
        self.line(&format!("  path: {}", meta.path));
        self.line(&format!("  name: {}", escape_toon_value(&meta.name)));
        if !meta.description.is_empty() {
            self.line(&format!("  desc: {}", escape_toon_value(&meta.description)));
        }
        if !meta.base_url.is_empty() {
            self.line(&format!("  url: {}{}", meta.base_url.trim_end_matches('/'), meta.path));
        }
        self.line("  type: documentation");
        self.line(&format!("  format: {}", FORMAT_VERSION));
        self.blank();
    }

    fn write_context<R: PageRegistry + ?Sized>(&mut self, registry: &R) {
        let pages = registry.pages();
        let related: Vec<_> = pages
            .iter()
            .filter(|p| !p.path.is_empty() && p.path != self.meta.path && !p.name.is_empty())
            .take(self.options.max_related_pages)
            .collect();

        self.line(&format!("context: {}-page docs site", pages.len()));
        if !related.is_empty() {
            self.line(&format!("relatedPages[{}]:", related.len()));
            for page in related {
                self.line(&format!("  {}: {}", escape_toon_value(&page.name), page.path));
            }
        }
        self.blank();
    }

    fn write_document(&mut self, doc: &ExtractedDocument) {
        self.write_sections(&doc.sections);
        self.write_directives(&doc.directives);
        self.write_exec_components(doc);
        self.write_code_examples(doc);
        self.write_tables(doc);
        self.write_lists(doc);
        self.write_tips(doc);
        self.write_best_practices(doc);
        self.write_patterns(doc);
        self.write_resources(doc);
    }

    fn write_sections(&mut self, sections: &[Section]) {
        let display: Vec<_> = sections
            .iter()
            .filter(|s| s.is_meaningful())
            .take(self.options.max_sections)
            .collect();
        if display.is_empty() {
            return;
        }

        self.line(&format!("sections[{}]:", display.len()));
        for (i, section) in display.iter().enumerate() {
            self.line(&format!(
                "  {}. [{}] {}",
                i + 1,
                section.level,
                section.title.replace('"', "'")
            ));

            let snippet = compress_section_content(&section.content, self.options.section_chars);
            let chars = snippet.chars().count();
            if chars <= SNIPPET_MIN_CHARS {
                continue;
            }
            if chars <= SNIPPET_INLINE_CHARS && !snippet.contains('\n') {
                self.line(&format!("     > {}", snippet));
            } else {
                for content_line in snippet.lines().take(SNIPPET_MAX_LINES) {
                    let content_line = content_line.trim();
                    if !content_line.is_empty() {
                        self.line(&format!("     {}", content_line));
                    }
                }
            }
        }
        self.blank();
        self.summary.push(format!("{} sections", display.len()));
    }

    fn write_directives(&mut self, directives: &[DirectiveInfo]) {
        let mut by_kind: IndexMap<DirectiveKind, Vec<&str>> = IndexMap::new();
        for directive in directives {
            let targets = by_kind.entry(directive.kind).or_default();
            if !targets.contains(&directive.target.as_str()) {
                targets.push(&directive.target);
            }
        }
        if by_kind.is_empty() {
            return;
        }

        self.line("directives:");
        for (kind, targets) in &by_kind {
            let shown: Vec<&str> = targets
                .iter()
                .map(|t| if t.is_empty() { "(none)" } else { *t })
                .collect();
            if shown.len() <= INLINE_TARGETS {
                self.line(&format!("  {}: [{}]", kind, shown.join(", ")));
            } else {
                self.line(&format!(
                    "  {}: [{}, {}, ...] ({} total)",
                    kind,
                    shown[0],
                    shown[1],
                    shown.len()
                ));
            }
        }
        self.blank();

        let mut kinds: Vec<&str> = by_kind.keys().map(DirectiveKind::as_str).collect();
        kinds.sort_unstable();
        self.tail.push(format!("uses {}", kinds.join(", ")));
    }

    fn write_exec_components(&mut self, doc: &ExtractedDocument) {
        if doc.exec_components.is_empty() {
            return;
        }
        self.line(&format!("execComponents[{}]:", doc.exec_components.len()));
        for component in &doc.exec_components {
            let marker = if component.has_callback { " [callback]" } else { "" };
            self.line(&format!("  - {}{}", component.module, marker));
        }
        self.blank();
        self.summary
            .push(format!("{} exec components", doc.exec_components.len()));

        let callbacks = doc.exec_components.iter().filter(|c| c.has_callback).count();
        if callbacks > 0 {
            self.tail.push(format!("{} interactive components", callbacks));
        }
    }

    fn write_code_examples(&mut self, doc: &ExtractedDocument) {
        let examples: Vec<_> = doc
            .code_examples
            .iter()
            .take(self.options.max_code_examples)
            .collect();
        if examples.is_empty() {
            return;
        }

        self.line(&format!("codeExamples[{}]:", examples.len()));
        for (i, example) in examples.iter().enumerate() {
            self.line(&format!("  {}:", i + 1));
            self.line(&format!(
                "    file: {}",
                example.source_file.as_deref().unwrap_or("inline")
            ));
            self.line(&format!("    lang: {}", example.language));
            let code = compress_code(&example.code, self.options.max_code_lines, true);
            self.write_code("    ", &code);
        }
        self.blank();
        self.summary.push(format!("{} code examples", examples.len()));
    }

    fn write_tables(&mut self, doc: &ExtractedDocument) {
        let tables: Vec<_> = doc.tables.iter().take(self.options.max_tables).collect();
        if tables.is_empty() {
            return;
        }

        let cell_chars = self.options.max_cell_chars;
        self.line(&format!("tables[{}]:", tables.len()));
        for (i, table) in tables.iter().enumerate() {
            self.line(&format!("  {}. [{}]", i + 1, table.headers.join("|")));
            for row in table.rows.iter().take(self.options.max_table_rows) {
                let cells: Vec<&str> = row.iter().map(|c| truncate_chars(c, cell_chars)).collect();
                self.line(&format!("     {}", cells.join("|")));
            }
        }
        self.blank();
        self.summary.push(format!("{} tables", tables.len()));
    }

    fn write_lists(&mut self, doc: &ExtractedDocument) {
        let lists: Vec<_> = doc
            .lists
            .iter()
            .filter(|l| l.is_substantial())
            .take(self.options.max_lists)
            .collect();
        if lists.is_empty() {
            return;
        }

        self.line(&format!("keyLists[{}]:", lists.len()));
        for list in &lists {
            let items: Vec<String> = list
                .items
                .iter()
                .take(self.options.max_list_items)
                .map(|item| escape_toon_value(&ellipsize(item, self.options.max_item_chars)))
                .collect();
            self.line(&format!("  - {}: {}", list.list_type.as_str(), items.join(", ")));
        }
        self.blank();
        self.summary.push(format!("{} key lists", lists.len()));
    }

    fn write_tips(&mut self, doc: &ExtractedDocument) {
        let tips: Vec<_> = doc.tips.iter().take(self.options.max_tips).collect();
        if tips.is_empty() {
            return;
        }

        self.line(&format!("tips[{}]:", tips.len()));
        for (i, tip) in tips.iter().enumerate() {
            match &tip.context {
                Some(context) => self.line(&format!("  {}. {}", i + 1, escape_toon_value(context))),
                None => self.line(&format!("  {}. (general)", i + 1)),
            }
            self.line(&format!("     lang: {}", tip.language));
            let code = compress_code(&tip.code, self.options.snippet_lines, true);
            self.write_code("     ", &code);
        }
        self.blank();
        self.summary.push(format!("{} tips", tips.len()));
    }

    fn write_best_practices(&mut self, doc: &ExtractedDocument) {
        let practices: Vec<_> = doc
            .best_practices
            .iter()
            .take(self.options.max_best_practices)
            .collect();
        if practices.is_empty() {
            return;
        }

        self.line(&format!("bestPractices[{}]:", practices.len()));
        for practice in practices.iter() {
            self.line(&format!("  {}. {}", practice.number, escape_toon_value(&practice.title)));
            if !practice.description.is_empty() {
                self.line(&format!("     desc: {}", escape_toon_value(&practice.description)));
            }
            if let Some(code) = &practice.code {
                if let Some(lang) = &practice.code_lang {
                    self.line(&format!("     lang: {}", lang));
                }
                let code = compress_code(code, self.options.snippet_lines, true);
                self.write_code("     ", &code);
            }
        }
        self.blank();
        self.summary.push(format!("{} best practices", practices.len()));
    }

    fn write_patterns(&mut self, doc: &ExtractedDocument) {
        let patterns: Vec<_> = doc.patterns.iter().take(self.options.max_patterns).collect();
        if patterns.is_empty() {
            return;
        }

        self.line(&format!("patterns[{}]:", patterns.len()));
        for pattern in patterns.iter() {
            self.line(&format!("  - {}", escape_toon_value(&pattern.name)));
            if !pattern.description.is_empty() {
                self.line(&format!("    desc: {}", escape_toon_value(&pattern.description)));
            }
            for (lang, code) in &pattern.code_blocks {
                self.line(&format!("    lang: {}", lang));
                let code = compress_code(code, self.options.snippet_lines, true);
                self.write_code("    ", &code);
            }
        }
        self.blank();
        self.summary.push(format!("{} patterns", patterns.len()));
    }

    fn write_resources(&mut self, doc: &ExtractedDocument) {
        let resources: Vec<_> = doc
            .resources
            .iter()
            .take(self.options.max_resources)
            .collect();
        if resources.is_empty() {
            return;
        }

        self.line(&format!("resources[{}]:", resources.len()));
        for resource in resources.iter() {
            self.line(&format!("  {}: {}", escape_toon_value(&resource.name), resource.url));
        }
        self.blank();
        self.summary.push(format!("{} resources", resources.len()));
    }
}
