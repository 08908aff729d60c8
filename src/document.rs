//! Typed records produced by a single extraction pass.
//!
//! Every record is an immutable value built once from the page markdown.
//! All of them serialize with serde so the `page.json` variant is a plain
//! dump of the same data the TOON serializer reads.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// The fixed set of custom directives recognised in `.. name::target` lines.
///
/// # Examples
///
/// ```rust
/// use docs_toon::DirectiveKind;
///
/// assert_eq!(DirectiveKind::from_name("SOURCE"), Some(DirectiveKind::Source));
/// assert_eq!(DirectiveKind::from_name("foobar"), None);
/// assert_eq!(DirectiveKind::LlmsCopy.as_str(), "llms_copy");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Exec,
    Source,
    Kwargs,
    Toc,
    LlmsCopy,
}

impl DirectiveKind {
    /// Looks up a directive by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "exec" => Some(DirectiveKind::Exec),
            "source" => Some(DirectiveKind::Source),
            "kwargs" => Some(DirectiveKind::Kwargs),
            "toc" => Some(DirectiveKind::Toc),
            "llms_copy" => Some(DirectiveKind::LlmsCopy),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Exec => "exec",
            DirectiveKind::Source => "source",
            DirectiveKind::Kwargs => "kwargs",
            DirectiveKind::Toc => "toc",
            DirectiveKind::LlmsCopy => "llms_copy",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directive option value; `true`/`false` (any case) become booleans.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

impl OptionValue {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            OptionValue::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            OptionValue::Bool(false)
        } else {
            OptionValue::Text(raw.to_string())
        }
    }
}

/// A parsed `.. name::target` directive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectiveInfo {
    pub kind: DirectiveKind,
    pub target: String,
    pub options: IndexMap<String, OptionValue>,
    pub line_number: usize,
    /// Byte offset of the directive line.
    #[serde(skip)]
    pub offset: usize,
}

/// A markdown heading plus the text beneath it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    pub level: u8,
    pub title: String,
    pub content: String,
    pub directives: Vec<DirectiveInfo>,
}

impl Section {
    /// A section is worth emitting when it has prose or directives.
    pub fn is_meaningful(&self) -> bool {
        !self.content.trim().is_empty() || !self.directives.is_empty()
    }
}

/// Code pulled from a `source` directive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CodeExample {
    pub language: String,
    pub code: String,
    pub source_file: Option<String>,
    pub directive_type: DirectiveKind,
}

/// Metadata about a module referenced by an `exec` directive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecComponent {
    pub module: String,
    pub file: String,
    pub exists: bool,
    pub has_callback: bool,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableInfo {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ListKind::Ordered => "ordered",
            ListKind::Unordered => "unordered",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListInfo {
    pub list_type: ListKind,
    pub items: Vec<String>,
}

impl ListInfo {
    /// Lists with more than two items carry enough signal to emit.
    pub fn is_substantial(&self) -> bool {
        self.items.len() > 2
    }
}

/// A short code snippet paired with the heading it sits under.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CodeTip {
    pub context: Option<String>,
    pub language: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestPractice {
    pub number: usize,
    pub title: String,
    pub description: String,
    pub code: Option<String>,
    pub code_lang: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    /// `(language, code)` pairs in document order.
    pub code_blocks: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

/// Everything a single extraction pass produces for one page.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub sections: Vec<Section>,
    pub directives: Vec<DirectiveInfo>,
    pub code_examples: Vec<CodeExample>,
    pub exec_components: Vec<ExecComponent>,
    pub tables: Vec<TableInfo>,
    pub lists: Vec<ListInfo>,
    pub tips: Vec<CodeTip>,
    pub best_practices: Vec<BestPractice>,
    pub patterns: Vec<Pattern>,
    pub resources: Vec<Resource>,
}
