//! `.. name::target` directives and the files they point at.
//!
//! Options are the indented `:key: value` lines right below a directive.
//! `source` and `exec` targets resolve against the configured source root
//! and never leave it.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, trace};

use super::blocks::MarkdownIndex;
use crate::document::{CodeExample, DirectiveInfo, DirectiveKind, ExecComponent, OptionValue};

static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\.\. (\w+)::(.*)$").unwrap());
static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+:(\w+):\s*(.*)$").unwrap());
static DOCSTRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\A\s*"""(.+?)""""#).unwrap());

/// How far past a directive line its `:key: value` options may extend, in chars.
const OPTION_WINDOW: usize = 200;

/// Strings whose presence marks an exec module as interactive.
const CALLBACK_MARKERS: &[&str] = &["@callback", "callback("];

/// File extension to display language.
const LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("pyi", "python"),
    ("js", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("tsx", "tsx"),
    ("css", "css"),
    ("scss", "scss"),
    ("sass", "sass"),
    ("less", "less"),
    ("html", "html"),
    ("htm", "html"),
    ("xml", "xml"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("rst", "rst"),
    ("txt", "text"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("sql", "sql"),
    ("r", "r"),
    ("toml", "toml"),
    ("rs", "rust"),
];

/// Maps a file extension to a display language, falling back to the raw
/// extension or `text` when there is none.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::language_for_extension;
///
/// assert_eq!(language_for_extension("py"), "python");
/// assert_eq!(language_for_extension("YML"), "yaml");
/// assert_eq!(language_for_extension("zig"), "zig");
/// assert_eq!(language_for_extension(""), "text");
/// ```
pub fn language_for_extension(ext: &str) -> String {
    let ext = ext.to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| lang.to_string())
        .unwrap_or_else(|| if ext.is_empty() { "text".into() } else { ext })
}

/// Display language for a file, from its extension.
pub fn language_for_path(path: &Path) -> String {
    language_for_extension(path.extension().and_then(|e| e.to_str()).unwrap_or(""))
}

/// Extracts every recognised directive, in document order.
///
/// Unknown directive names are dropped silently.
///
/// # Examples
///
/// ```rust
/// use docs_toon::extract::extract_directives;
/// use docs_toon::DirectiveKind;
///
/// let md = ".. source::docs/button.py\n    :defaultExpanded: true\n.. foobar::x\n";
/// let directives = extract_directives(md);
/// assert_eq!(directives.len(), 1);
/// assert_eq!(directives[0].kind, DirectiveKind::Source);
/// assert_eq!(directives[0].line_number, 1);
/// ```
pub fn extract_directives(markdown: &str) -> Vec<DirectiveInfo> {
    directives_in(&MarkdownIndex::new(markdown))
}

pub(crate) fn directives_in(index: &MarkdownIndex<'_>) -> Vec<DirectiveInfo> {
    let markdown = index.text;
    let mut directives = Vec::new();

    for caps in DIRECTIVE_RE.captures_iter(markdown) {
        let Some(whole) = caps.get(0) else { continue };
        if index.in_fence(whole.start()) {
            continue;
        }
        let Some(kind) = DirectiveKind::from_name(&caps[1]) else {
            trace!(directive = &caps[1], "skipping unknown directive");
            continue;
        };

        directives.push(DirectiveInfo {
            kind,
            target: caps[2].trim().to_string(),
            options: parse_options(markdown, whole.end()),
            line_number: markdown[..whole.start()].matches('\n').count() + 1,
            offset: whole.start(),
        });
    }

    directives
}

/// Reads indented `:key: value` lines following a directive. Scanning stops
/// at the window edge or the first line that is neither blank nor an option.
fn parse_options(markdown: &str, directive_end: usize) -> IndexMap<String, OptionValue> {
    let rest = &markdown[directive_end..];
    let window_end = rest
        .char_indices()
        .nth(OPTION_WINDOW)
        .map_or(rest.len(), |(i, _)| i);
    let window = &rest[..window_end];
    let mut options = IndexMap::new();

    // First piece is the remainder of the directive line itself.
    for line in window.split('\n').skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match OPTION_RE.captures(line.trim_end_matches('\r')) {
            Some(caps) => {
                options.insert(caps[1].to_string(), OptionValue::parse(&caps[2]));
            }
            None => break,
        }
    }

    options
}

/// First path of a possibly comma-separated target list.
pub fn primary_target(target: &str) -> Option<&str> {
    target
        .split(',')
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Joins a directive target onto `root`.
///
/// Targets must stay below the root: absolute paths and `..` components
/// resolve to `None`.
pub fn resolve_under(root: &Path, target: &str) -> Option<PathBuf> {
    let relative = Path::new(target);
    if relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        Some(root.join(relative))
    } else {
        debug!(path = target, "directive target escapes the source root");
        None
    }
}

/// Reads the file named by a `source` directive.
///
/// Returns `None` when the file cannot be read; callers omit the example.
pub fn process_source_directive(target: &str, root: &Path) -> Option<CodeExample> {
    let target = primary_target(target)?;
    let path = resolve_under(root, target)?;

    match fs::read_to_string(&path) {
        Ok(code) => Some(CodeExample {
            language: language_for_path(&path),
            code,
            source_file: Some(target.to_string()),
            directive_type: DirectiveKind::Source,
        }),
        Err(err) => {
            debug!(file = %path.display(), error = %err, "source file unavailable, omitting example");
            None
        }
    }
}

/// Resolves a dotted `exec` module path to a file and inspects it.
///
/// Never fails: a missing or unreadable module yields `exists: false`
/// or an empty description.
pub fn process_exec_directive(target: &str, root: &Path, extension: &str) -> ExecComponent {
    let module = target.trim();
    let file = format!("{}.{}", module.replace('.', "/"), extension);
    let path = resolve_under(root, &file);
    let exists = path.as_deref().is_some_and(Path::is_file);

    let mut component = ExecComponent {
        module: module.to_string(),
        file,
        exists,
        has_callback: false,
        description: None,
    };

    let Some(path) = path.filter(|_| exists) else {
        debug!(module, file = %component.file, "exec module not found");
        return component;
    };

    match fs::read_to_string(&path) {
        Ok(content) => {
            component.has_callback = CALLBACK_MARKERS.iter().any(|m| content.contains(m));
            component.description = DOCSTRING_RE
                .captures(&content)
                .and_then(|caps| caps[1].trim().lines().next().map(|l| l.trim().to_string()))
                .filter(|d| !d.is_empty());
        }
        Err(err) => debug!(module, error = %err, "exec module unreadable"),
    }

    component
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_options() {
        let md = ".. kwargs::dmc.Button\n    :library: dmc\n    :expanded: False\n\nText\n";
        let d = &extract_directives(md)[0];
        assert_eq!(d.kind, DirectiveKind::Kwargs);
        assert_eq!(d.target, "dmc.Button");
        assert_eq!(
            d.options.get("library"),
            Some(&OptionValue::Text("dmc".into()))
        );
        assert_eq!(d.options.get("expanded"), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_repeated_option_last_wins() {
        let md = ".. toc::\n  :depth: 2\n  :depth: 3\n";
        let d = &extract_directives(md)[0];
        assert_eq!(d.options.len(), 1);
        assert_eq!(d.options.get("depth"), Some(&OptionValue::Text("3".into())));
        assert_eq!(d.target, "");
    }

    #[test]
    fn test_options_do_not_leak_into_next_directive() {
        let md = ".. exec::docs.a\n.. source::docs/a.py\n  :title: A\n";
        let directives = extract_directives(md);
        assert_eq!(directives.len(), 2);
        assert!(directives[0].options.is_empty());
        assert_eq!(directives[1].line_number, 2);
        assert_eq!(directives[1].options.len(), 1);
    }

    #[test]
    fn test_unknown_and_fenced_directives_skipped() {
        let md = ".. foobar::target\n```rst\n.. source::x.py\n```\n.. LLMS_COPY::Page\n";
        let directives = extract_directives(md);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].kind, DirectiveKind::LlmsCopy);
        assert_eq!(directives[0].line_number, 5);
    }

    #[test]
    fn test_option_window_counts_chars() {
        let md = format!(".. toc::\n    :title: {}\n    :depth: 2\n", "é".repeat(150));
        let d = &extract_directives(&md)[0];
        assert_eq!(
            d.options.get("title"),
            Some(&OptionValue::Text("é".repeat(150)))
        );
        assert_eq!(d.options.get("depth"), Some(&OptionValue::Text("2".into())));
    }

    #[test]
    fn test_targets_outside_root_are_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let secret = outside.path().join("secret.py");
        std::fs::write(&secret, "token = 1\n").unwrap();
        let root = tempfile::tempdir().unwrap();

        let absolute = secret.to_string_lossy();
        assert!(process_source_directive(&absolute, root.path()).is_none());
        assert!(process_source_directive("../secret.py", root.path()).is_none());
        assert!(resolve_under(root.path(), "./docs/a.py").is_some());

        let exec = process_exec_directive(".secret", outside.path(), "py");
        assert!(!exec.exists);
    }

    #[test]
    fn test_primary_target() {
        assert_eq!(primary_target(" a.py , b.py"), Some("a.py"));
        assert_eq!(primary_target(""), None);
    }

    #[test]
    fn test_missing_source_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(process_source_directive("nope.py", dir.path()).is_none());
    }

    #[test]
    fn test_exec_directive_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/demo")).unwrap();
        std::fs::write(
            dir.path().join("docs/demo/counter.py"),
            "\"\"\"Counter example.\nMore text.\n\"\"\"\n@callback(Output('a', 'children'))\ndef f(): pass\n",
        )
        .unwrap();

        let info = process_exec_directive("docs.demo.counter", dir.path(), "py");
        assert_eq!(info.file, "docs/demo/counter.py");
        assert!(info.exists);
        assert!(info.has_callback);
        assert_eq!(info.description.as_deref(), Some("Counter example."));

        let missing = process_exec_directive("docs.gone", dir.path(), "py");
        assert!(!missing.exists);
        assert!(missing.description.is_none());
    }
}
