//! # docs_toon
//!
//! Compact, LLM-oriented renderings of documentation pages written in markdown.
//!
//! ## What does it produce?
//!
//! A documentation page is markdown with a few custom directive lines
//! (`.. source::app.py`, `.. exec::docs.demo`, `.. toc::`). This crate parses
//! such a page once and emits a size-reduced TOON text that keeps what an
//! assistant needs: the outline, short section snippets, referenced source
//! code, tables, key lists, code tips, best practices, patterns and links.
//!
//! ## Key Features
//!
//! - **Single pass**: fences and headings are indexed once, every extractor
//!   works over the same immutable text
//! - **Fence aware**: headings, directives and links inside code blocks are
//!   never mistaken for document structure
//! - **Bounded output**: every category is capped, and every `name[N]:`
//!   header states the emitted count
//! - **Deterministic**: identical input always yields byte-identical output
//! - **Never fails on content**: unknown directives and missing files drop
//!   the affected item instead of aborting the page
//!
//! ## Quick Start
//!
//! ```rust
//! use docs_toon::{generate_documentation_toon, PageEntry, PageMeta};
//!
//! let markdown = "\
//! ### Installation
//! Install the package with pip and import it in your application module.
//!
//! | Option | Default |
//! |--------|---------|
//! | debug  | false   |
//! ";
//!
//! let meta = PageMeta::new("/docs/install", "Installation");
//! let registry = vec![PageEntry::new("/docs/install", "Installation")];
//!
//! let toon = generate_documentation_toon(&meta, markdown, &registry);
//! assert!(toon.contains("sections[1]:\n  1. [2] Installation\n"));
//! assert!(toon.contains("tables[1]:\n  1. [Option|Default]\n     debug|false\n"));
//! ```
//!
//! ### Step by step
//!
//! Extraction and serialization are separate, so the typed records can be
//! inspected or serialized to JSON on their own:
//!
//! ```rust
//! use docs_toon::{build_documentation_toon, extract_document, PageMeta, ToonOptions};
//!
//! let options = ToonOptions::new().with_max_sections(5);
//! let doc = extract_document("## A\ntext\n.. toc::\n", &options);
//! assert_eq!(doc.directives.len(), 1);
//!
//! let registry: Vec<docs_toon::PageEntry> = Vec::new();
//! let toon = build_documentation_toon(&PageMeta::new("/a", "A"), &doc, &registry, &options);
//! assert!(toon.contains("directives:\n  toc: [(none)]\n"));
//! ```
//!
//! ## Serving pages
//!
//! [`Site`] maps request paths such as `/docs/intro/llms.toon` to the
//! markdown, TOON or JSON variant of a registered page. See [`site`].
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] at `debug`/`trace` level and never
//! installs a subscriber.
//!
//! ## Format Reference
//!
//! The emitted layout is described block by block in [`format`].

pub mod compress;
pub mod document;
pub mod error;
pub mod extract;
pub mod format;
pub mod options;
pub mod ser;
pub mod site;

pub use compress::{compress_code, compress_section_content};
pub use document::{
    BestPractice, CodeExample, CodeTip, DirectiveInfo, DirectiveKind, ExecComponent,
    ExtractedDocument, ListInfo, ListKind, OptionValue, Pattern, Resource, Section, TableInfo,
};
pub use error::{Error, Result};
pub use extract::extract_document;
pub use options::{ToonOptions, DEFAULT_RESOURCE_DOMAINS};
pub use ser::{build_documentation_toon, escape_toon_value};
pub use site::{expand_source_directives, PageEntry, PageFormat, PageMeta, PageRegistry, Site};

use serde::Serialize;
use std::io;

/// Extracts and serializes one page with default options.
///
/// # Examples
///
/// ```rust
/// use docs_toon::{generate_documentation_toon, PageEntry, PageMeta};
///
/// let registry: Vec<PageEntry> = Vec::new();
/// let toon = generate_documentation_toon(&PageMeta::new("/", "Home"), "", &registry);
/// assert!(toon.ends_with("summary: Home:"));
/// ```
pub fn generate_documentation_toon<R>(meta: &PageMeta, markdown: &str, registry: &R) -> String
where
    R: PageRegistry + ?Sized,
{
    generate_documentation_toon_with_options(meta, markdown, registry, &ToonOptions::default())
}

/// Extracts and serializes one page with custom options.
///
/// # Examples
///
/// ```rust
/// use docs_toon::{generate_documentation_toon_with_options, PageEntry, PageMeta, ToonOptions};
///
/// let markdown = "## One\nfirst\n## Two\nsecond\n## Three\nthird\n";
/// let options = ToonOptions::new().with_max_sections(2);
/// let registry: Vec<PageEntry> = Vec::new();
///
/// let toon = generate_documentation_toon_with_options(&PageMeta::new("/", "Home"), markdown, &registry, &options);
/// assert!(toon.contains("sections[2]:"));
/// assert!(!toon.contains("Three"));
/// ```
pub fn generate_documentation_toon_with_options<R>(
    meta: &PageMeta,
    markdown: &str,
    registry: &R,
    options: &ToonOptions,
) -> String
where
    R: PageRegistry + ?Sized,
{
    let doc = extract_document(markdown, options);
    build_documentation_toon(meta, &doc, registry, options)
}

/// Writes the documentation TOON for one page to a writer.
///
/// # Examples
///
/// ```rust
/// use docs_toon::{write_documentation_toon, PageEntry, PageMeta, ToonOptions};
///
/// let mut buffer = Vec::new();
/// let registry: Vec<PageEntry> = Vec::new();
/// write_documentation_toon(&mut buffer, &PageMeta::new("/", "Home"), "## A\n", &registry, &ToonOptions::default()).unwrap();
/// assert!(String::from_utf8(buffer).unwrap().starts_with("meta:\n"));
/// ```
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_documentation_toon<W, R>(
    mut writer: W,
    meta: &PageMeta,
    markdown: &str,
    registry: &R,
    options: &ToonOptions,
) -> Result<()>
where
    W: io::Write,
    R: PageRegistry + ?Sized,
{
    let toon = generate_documentation_toon_with_options(meta, markdown, registry, options);
    writer
        .write_all(toon.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonPage<'a> {
    meta: &'a PageMeta,
    #[serde(flatten)]
    document: &'a ExtractedDocument,
}

/// Serializes page metadata plus the extracted records as pretty JSON.
///
/// The document fields sit next to a `meta` object at the top level.
///
/// # Examples
///
/// ```rust
/// use docs_toon::{extract_document, to_json_string, PageMeta, ToonOptions};
///
/// let doc = extract_document("## Intro\nHello.\n", &ToonOptions::default());
/// let json = to_json_string(&PageMeta::new("/intro", "Intro"), &doc).unwrap();
/// let value: serde_json::Value = serde_json::from_str(&json).unwrap();
/// assert_eq!(value["meta"]["path"], "/intro");
/// assert_eq!(value["sections"][0]["level"], 2);
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string(meta: &PageMeta, doc: &ExtractedDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonPage {
        meta,
        document: doc,
    })?)
}
