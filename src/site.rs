//! Page registry and per-page output variants.
//!
//! A [`Site`] holds the registered pages and their raw markdown, and renders
//! each page in one of three machine-readable variants:
//!
//! | request suffix | [`PageFormat`] | body |
//! |---|---|---|
//! | `llms.txt` | `Markdown` | markdown with `source` directives expanded |
//! | `llms.toon` | `Toon` | documentation TOON |
//! | `page.json` | `Json` | extracted records as JSON |
//!
//! ## Examples
//!
//! ```rust
//! use docs_toon::{PageEntry, PageFormat, Site};
//!
//! let mut site = Site::new("https://docs.example.com");
//! site.add_page(PageEntry::new("/docs/intro", "Intro"), "## Welcome\nHello.\n");
//!
//! let (path, format) = PageFormat::from_request_path("/docs/intro/llms.toon").unwrap();
//! let toon = site.render(path, format).unwrap();
//! assert!(toon.contains("url: https://docs.example.com/docs/intro"));
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::extract::blocks::MarkdownIndex;
use crate::extract::directives::{language_for_path, primary_target, resolve_under};
use crate::{extract_document, DirectiveKind, Error, Result, ToonOptions};

static DIRECTIVE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\. (\w+)::(.*)$").unwrap());
static OPTION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+:\w+:").unwrap());

/// Metadata of the page being rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub path: String,
    pub name: String,
    pub description: String,
    /// Site origin; when set, the `meta` block gains a `url` line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
}

impl PageMeta {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        PageMeta {
            path: path.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn from_entry(entry: &PageEntry, base_url: &str) -> Self {
        PageMeta {
            path: entry.path.clone(),
            name: entry.name.clone(),
            description: entry.description.clone(),
            base_url: base_url.to_string(),
        }
    }
}

/// One page known to the site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub path: String,
    pub name: String,
    pub description: String,
}

impl PageEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        PageEntry {
            path: path.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Source of the site-wide page list used for the `context` block.
pub trait PageRegistry {
    fn pages(&self) -> &[PageEntry];
}

impl PageRegistry for [PageEntry] {
    fn pages(&self) -> &[PageEntry] {
        self
    }
}

impl PageRegistry for Vec<PageEntry> {
    fn pages(&self) -> &[PageEntry] {
        self
    }
}

/// Output variant of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageFormat {
    Markdown,
    Toon,
    Json,
}

impl PageFormat {
    const ALL: [PageFormat; 3] = [PageFormat::Markdown, PageFormat::Toon, PageFormat::Json];

    /// The trailing path segment that selects this variant.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            PageFormat::Markdown => "llms.txt",
            PageFormat::Toon => "llms.toon",
            PageFormat::Json => "page.json",
        }
    }

    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            PageFormat::Markdown | PageFormat::Toon => "text/plain; charset=utf-8",
            PageFormat::Json => "application/json",
        }
    }

    /// Splits a request path into the page path and the requested variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use docs_toon::PageFormat;
    ///
    /// assert_eq!(
    ///     PageFormat::from_request_path("/docs/intro/page.json"),
    ///     Some(("/docs/intro", PageFormat::Json))
    /// );
    /// assert_eq!(PageFormat::from_request_path("/llms.txt"), Some(("/", PageFormat::Markdown)));
    /// assert_eq!(PageFormat::from_request_path("/docs/intro"), None);
    /// ```
    pub fn from_request_path(request: &str) -> Option<(&str, PageFormat)> {
        Self::ALL.into_iter().find_map(|format| {
            let page = request.strip_suffix(format.suffix())?;
            let page = page.strip_suffix('/')?;
            Some((if page.is_empty() { "/" } else { page }, format))
        })
    }
}

/// Registered pages, their markdown, and the options used to render them.
#[derive(Clone, Debug)]
pub struct Site {
    base_url: String,
    options: ToonOptions,
    pages: Vec<PageEntry>,
    content: HashMap<String, String>,
}

impl Site {
    pub fn new(base_url: impl Into<String>) -> Self {
        Site {
            base_url: base_url.into(),
            options: ToonOptions::default(),
            pages: Vec::new(),
            content: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ToonOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ToonOptions {
        &self.options
    }

    /// Registers a page. Re-adding a path replaces its entry and markdown
    /// but keeps its original position in the registry.
    pub fn add_page(&mut self, entry: PageEntry, markdown: impl Into<String>) {
        self.content.insert(entry.path.clone(), markdown.into());
        match self.pages.iter_mut().find(|p| p.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.pages.push(entry),
        }
    }

    pub fn page(&self, path: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.path == path)
    }

    /// Renders one page variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageNotFound`] when no markdown is registered for
    /// `path`, and [`Error::Json`] if the JSON variant fails to serialize.
    pub fn render(&self, path: &str, format: PageFormat) -> Result<String> {
        let (Some(entry), Some(markdown)) = (self.page(path), self.content.get(path)) else {
            return Err(Error::page_not_found(path));
        };
        debug!(path, format = format.suffix(), "rendering page");

        let meta = PageMeta::from_entry(entry, &self.base_url);
        match format {
            PageFormat::Markdown => Ok(expand_source_directives(markdown, &self.options.source_root)),
            PageFormat::Toon => Ok(crate::generate_documentation_toon_with_options(
                &meta,
                markdown,
                &self.pages,
                &self.options,
            )),
            PageFormat::Json => {
                let doc = extract_document(markdown, &self.options);
                crate::to_json_string(&meta, &doc)
            }
        }
    }

    /// Renders the variant named by a full request path such as
    /// `/docs/intro/llms.toon`.
    pub fn render_request(&self, request: &str) -> Result<String> {
        let (path, format) =
            PageFormat::from_request_path(request).ok_or_else(|| Error::page_not_found(request))?;
        self.render(path, format)
    }
}

impl PageRegistry for Site {
    fn pages(&self) -> &[PageEntry] {
        &self.pages
    }
}

/// Replaces each `.. source::target` line, and its option lines, with a
/// fenced block holding the referenced file.
///
/// Directives whose file cannot be read are left as they are, and every
/// other directive passes through verbatim.
///
/// # Examples
///
/// ```rust
/// use docs_toon::expand_source_directives;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("app.py"), "import dash\n").unwrap();
///
/// let md = "Intro\n.. source::app.py\n    :defaultExpanded: true\n.. toc::\n";
/// let out = expand_source_directives(md, dir.path());
/// assert_eq!(out, "Intro\n```python\nimport dash\n```\n.. toc::\n");
/// ```
pub fn expand_source_directives(markdown: &str, root: &Path) -> String {
    let index = MarkdownIndex::new(markdown);
    let mut out = String::with_capacity(markdown.len());
    let mut lines = index.lines.iter().peekable();

    while let Some(line) = lines.next() {
        let raw = &markdown[line.start..line.next];
        let Some(code_block) = (!index.in_fence(line.start))
            .then(|| source_block(line.text, root))
            .flatten()
        else {
            out.push_str(raw);
            continue;
        };

        while lines.peek().is_some_and(|next| OPTION_LINE_RE.is_match(next.text)) {
            lines.next();
        }
        out.push_str(&code_block);
        if raw.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

/// The fenced replacement for a `source` directive line, if its file exists.
fn source_block(line: &str, root: &Path) -> Option<String> {
    let caps = DIRECTIVE_LINE_RE.captures(line)?;
    if DirectiveKind::from_name(&caps[1]) != Some(DirectiveKind::Source) {
        return None;
    }
    let target = primary_target(&caps[2])?;
    let path = resolve_under(root, target)?;
    match std::fs::read_to_string(&path) {
        Ok(code) => Some(format!(
            "```{}\n{}\n```",
            language_for_path(&path),
            code.trim_end_matches('\n')
        )),
        Err(err) => {
            debug!(file = %path.display(), error = %err, "leaving source directive unexpanded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        let mut site = Site::new("https://docs.example.com");
        site.add_page(PageEntry::new("/", "Home"), "## Home\nWelcome.\n");
        site.add_page(
            PageEntry::new("/docs/intro", "Intro").with_description("First steps"),
            "## Setup\nInstall the package.\n",
        );
        site
    }

    #[test]
    fn test_request_paths() {
        assert_eq!(
            PageFormat::from_request_path("/docs/intro/llms.txt"),
            Some(("/docs/intro", PageFormat::Markdown))
        );
        assert_eq!(PageFormat::from_request_path("/docs/introllms.txt"), None);
        assert_eq!(PageFormat::Json.content_type(), "application/json");
    }

    #[test]
    fn test_render_variants() {
        let site = site();
        let markdown = site.render("/docs/intro", PageFormat::Markdown).unwrap();
        assert_eq!(markdown, "## Setup\nInstall the package.\n");

        let toon = site.render_request("/docs/intro/llms.toon").unwrap();
        assert!(toon.contains("  desc: First steps\n"));
        assert!(toon.contains("context: 2-page docs site\nrelatedPages[1]:\n  Home: /\n"));

        let json: serde_json::Value =
            serde_json::from_str(&site.render("/docs/intro", PageFormat::Json).unwrap()).unwrap();
        assert_eq!(json["meta"]["name"], "Intro");
        assert_eq!(json["sections"][0]["title"], "Setup");
    }

    #[test]
    fn test_missing_page() {
        let err = site().render("/nope", PageFormat::Markdown).unwrap_err();
        assert!(matches!(err, Error::PageNotFound(p) if p == "/nope"));
        assert!(site().render_request("/docs/intro").is_err());
    }

    #[test]
    fn test_re_adding_page_keeps_position() {
        let mut site = site();
        site.add_page(PageEntry::new("/", "Start"), "## New\n");
        let names: Vec<_> = site.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Start", "Intro"]);
        assert_eq!(site.render("/", PageFormat::Markdown).unwrap(), "## New\n");
    }

    #[test]
    fn test_missing_source_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let md = ".. source::gone.py\n    :defaultExpanded: true\n";
        assert_eq!(expand_source_directives(md, dir.path()), md);
    }

    #[test]
    fn test_source_outside_root_not_expanded() {
        let outside = tempfile::tempdir().unwrap();
        let secret = outside.path().join("secret.py");
        std::fs::write(&secret, "token = 1\n").unwrap();
        let root = tempfile::tempdir().unwrap();

        let md = format!(".. source::{}\n", secret.display());
        assert_eq!(expand_source_directives(&md, root.path()), md);
    }

    #[test]
    fn test_fenced_directive_not_expanded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        let md = "```rst\n.. source::a.py\n```\n.. source::a.py";
        let out = expand_source_directives(md, dir.path());
        assert_eq!(out, "```rst\n.. source::a.py\n```\n```python\nx = 1\n```");
    }
}
