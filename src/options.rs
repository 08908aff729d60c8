//! Configuration options for documentation TOON generation.
//!
//! [`ToonOptions`] controls where directive targets resolve on disk, how much
//! of each category is emitted, and which hosts count as known resource
//! domains.
//!
//! ## Examples
//!
//! ```rust
//! use docs_toon::ToonOptions;
//!
//! let options = ToonOptions::new()
//!     .with_source_root("site")
//!     .with_max_sections(10)
//!     .with_resource_domains(["docs.rs", "crates.io"]);
//!
//! assert_eq!(options.max_sections, 10);
//! assert_eq!(options.resource_domains.len(), 2);
//! ```

use std::path::PathBuf;

/// Hosts whose links are kept as resources when a page has no
/// Resources-like section.
pub const DEFAULT_RESOURCE_DOMAINS: &[&str] = &[
    "dash.plotly.com",
    "plotly.com",
    "mantine.dev",
    "dash-mantine-components",
    "github.com",
    "pypi.org",
    "docs.python.org",
];

/// Configuration options for documentation TOON generation.
///
/// Every `max_*` field caps what the serializer emits; counts in the output
/// headers always reflect the capped number.
///
/// # Examples
///
/// ```rust
/// use docs_toon::ToonOptions;
///
/// let options = ToonOptions::default();
/// assert_eq!(options.max_sections, 20);
/// assert_eq!(options.max_code_lines, 20);
/// assert_eq!(options.exec_extension, "py");
/// ```
#[derive(Clone, Debug)]
pub struct ToonOptions {
    pub source_root: PathBuf,
    pub exec_extension: String,
    pub max_sections: usize,
    pub section_chars: usize,
    pub max_related_pages: usize,
    pub max_code_lines: usize,
    pub max_code_examples: usize,
    pub max_tables: usize,
    pub max_table_rows: usize,
    pub max_cell_chars: usize,
    pub max_lists: usize,
    pub max_list_items: usize,
    pub max_item_chars: usize,
    pub max_tips: usize,
    pub max_best_practices: usize,
    pub max_patterns: usize,
    pub max_resources: usize,
    pub snippet_lines: usize,
    pub resource_domains: Vec<String>,
}

impl Default for ToonOptions {
    fn default() -> Self {
        ToonOptions {
            source_root: PathBuf::from("."),
            exec_extension: "py".to_string(),
            max_sections: 20,
            section_chars: 300,
            max_related_pages: 5,
            max_code_lines: 20,
            max_code_examples: 10,
            max_tables: 10,
            max_table_rows: 15,
            max_cell_chars: 50,
            max_lists: 5,
            max_list_items: 5,
            max_item_chars: 60,
            max_tips: 8,
            max_best_practices: 10,
            max_patterns: 6,
            max_resources: 12,
            snippet_lines: 12,
            resource_domains: DEFAULT_RESOURCE_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl ToonOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory that `source` and `exec` directive targets are
    /// resolved against.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use docs_toon::ToonOptions;
    /// use std::path::Path;
    ///
    /// let options = ToonOptions::new().with_source_root("/srv/docs");
    /// assert_eq!(options.source_root, Path::new("/srv/docs"));
    /// ```
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Sets the file extension appended to dotted `exec` module paths.
    #[must_use]
    pub fn with_exec_extension(mut self, ext: &str) -> Self {
        self.exec_extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Sets the maximum number of sections emitted.
    #[must_use]
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = max;
        self
    }

    /// Sets the character budget for each section snippet.
    #[must_use]
    pub fn with_section_chars(mut self, chars: usize) -> Self {
        self.section_chars = chars;
        self
    }

    /// Sets the line budget for each emitted code example.
    #[must_use]
    pub fn with_max_code_lines(mut self, lines: usize) -> Self {
        self.max_code_lines = lines;
        self
    }

    /// Sets the line budget for tip, best-practice and pattern snippets.
    #[must_use]
    pub fn with_snippet_lines(mut self, lines: usize) -> Self {
        self.snippet_lines = lines;
        self
    }

    /// Sets the maximum number of tips emitted.
    #[must_use]
    pub fn with_max_tips(mut self, max: usize) -> Self {
        self.max_tips = max;
        self
    }

    /// Sets the maximum number of resources emitted.
    #[must_use]
    pub fn with_max_resources(mut self, max: usize) -> Self {
        self.max_resources = max;
        self
    }

    /// Replaces the resource domain allow-list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use docs_toon::ToonOptions;
    ///
    /// let options = ToonOptions::new().with_resource_domains(["example.org"]);
    /// assert_eq!(options.resource_domains, vec!["example.org".to_string()]);
    /// ```
    #[must_use]
    pub fn with_resource_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_domains = domains.into_iter().map(Into::into).collect();
        self
    }
}
