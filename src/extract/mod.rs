//! Markdown extraction pipeline.
//!
//! A page's raw markdown goes through one [`MarkdownIndex`] (fences and
//! headings located once), then through each extractor in a fixed order:
//!
//! 1. sections and directives
//! 2. tables and lists
//! 3. best practices and patterns, which claim their byte ranges
//! 4. resources
//! 5. tips, which skip every claimed range
//!
//! `source` and `exec` directives are then resolved against the filesystem.
//! Nothing here fails; unreadable files just drop the item that needed them.

pub mod blocks;
pub mod directives;
pub mod practices;
pub mod resources;
pub mod scope;
pub mod structure;
pub mod tips;

use std::collections::HashSet;

use tracing::debug;

pub use blocks::{CodeFence, Heading, MarkdownIndex};
pub use directives::{
    extract_directives, language_for_extension, language_for_path, primary_target,
    process_exec_directive, process_source_directive, resolve_under,
};
pub use practices::{extract_best_practices, extract_patterns, Scoped};
pub use resources::extract_resources;
pub use scope::{find_scope, ClaimedRanges, Scope};
pub use structure::{extract_lists, extract_sections, extract_tables};
pub use tips::extract_tips;

use crate::document::{
    CodeExample, DirectiveInfo, DirectiveKind, ExecComponent, ExtractedDocument,
};
use crate::ToonOptions;

/// Runs every extractor over `markdown` and resolves directive targets.
///
/// # Examples
///
/// ```rust
/// use docs_toon::{extract_document, ToonOptions};
///
/// let md = "## Intro\nHello.\n\n| A | B |\n|---|---|\n| 1 | 2 |\n";
/// let doc = extract_document(md, &ToonOptions::default());
/// assert_eq!(doc.sections.len(), 1);
/// assert_eq!(doc.tables.len(), 1);
/// ```
pub fn extract_document(markdown: &str, options: &ToonOptions) -> ExtractedDocument {
    let index = MarkdownIndex::new(markdown);

    let directives = directives::directives_in(&index);
    let sections = structure::sections_in(&index, &directives);
    let tables = structure::tables_in(&index);
    let lists = structure::lists_in(&index);

    let mut claimed = ClaimedRanges::new();
    let best_practices = practices::best_practices_in(&index);
    let patterns = practices::patterns_in(&index);
    for scope in [&best_practices.scope, &patterns.scope].into_iter().flatten() {
        claimed.claim(scope.range.clone());
    }

    let resources = resources::resources_in(&index, &options.resource_domains);
    let tips = tips::tips_in(&index, &claimed);

    let code_examples = resolve_code_examples(&directives, options);
    let exec_components = resolve_exec_components(&directives, options);

    debug!(
        sections = sections.len(),
        directives = directives.len(),
        code_examples = code_examples.len(),
        tables = tables.len(),
        tips = tips.len(),
        best_practices = best_practices.items.len(),
        patterns = patterns.items.len(),
        resources = resources.len(),
        "extracted markdown"
    );

    ExtractedDocument {
        sections,
        directives,
        code_examples,
        exec_components,
        tables,
        lists,
        tips,
        best_practices: best_practices.items,
        patterns: patterns.items,
        resources,
    }
}

/// One example per distinct source file, first occurrence wins.
fn resolve_code_examples(directives: &[DirectiveInfo], options: &ToonOptions) -> Vec<CodeExample> {
    let mut seen = HashSet::new();
    directives
        .iter()
        .filter(|d| d.kind == DirectiveKind::Source)
        .filter_map(|d| {
            let target = primary_target(&d.target)?;
            if !seen.insert(target.to_string()) {
                return None;
            }
            process_source_directive(target, &options.source_root)
        })
        .collect()
}

/// One component per distinct module path, first occurrence wins.
fn resolve_exec_components(
    directives: &[DirectiveInfo],
    options: &ToonOptions,
) -> Vec<ExecComponent> {
    let mut seen = HashSet::new();
    directives
        .iter()
        .filter(|d| d.kind == DirectiveKind::Exec && !d.target.is_empty())
        .filter(|d| seen.insert(d.target.as_str()))
        .map(|d| process_exec_directive(&d.target, &options.source_root, &options.exec_extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_examples_deduplicated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), "print('a')\n").unwrap();
        std::fs::write(dir.path().join("b.js"), "console.log('b')\n").unwrap();

        let md = ".. source::a.py\n.. source::a.py\n.. source::b.js,a.py\n.. source::missing.py\n";
        let options = ToonOptions::new().with_source_root(dir.path());
        let doc = extract_document(md, &options);

        let files: Vec<_> = doc
            .code_examples
            .iter()
            .map(|e| e.source_file.as_deref().unwrap())
            .collect();
        assert_eq!(files, vec!["a.py", "b.js"]);
        assert_eq!(doc.code_examples[1].language, "javascript");
        assert_eq!(doc.directives.len(), 4);
    }

    #[test]
    fn test_exec_components_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let md = ".. exec::docs.a\n.. exec::docs.a\n.. exec::docs.b\n";
        let doc = extract_document(md, &ToonOptions::new().with_source_root(dir.path()));
        let modules: Vec<_> = doc.exec_components.iter().map(|c| c.module.as_str()).collect();
        assert_eq!(modules, vec!["docs.a", "docs.b"]);
        assert!(doc.exec_components.iter().all(|c| !c.exists));
    }

    #[test]
    fn test_best_practice_code_is_not_a_tip() {
        let md = "\
## Quick Start
```python
import dash
app = dash.Dash()
```

## Best Practices
### Keep IDs unique
Duplicate IDs break callbacks.
```python
html.Div(id='a')
html.Div(id='b')
```
";
        let doc = extract_document(md, &ToonOptions::default());
        assert_eq!(doc.best_practices.len(), 1);
        assert_eq!(doc.tips.len(), 1);
        assert_eq!(doc.tips[0].context.as_deref(), Some("Quick Start"));
    }
}
