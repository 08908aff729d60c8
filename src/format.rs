//! Documentation TOON Format Reference
//!
//! This module documents the layout written by
//! [`build_documentation_toon`](crate::build_documentation_toon).
//!
//! # Overview
//!
//! The format is line oriented. A page renders as a sequence of blocks in a
//! fixed order, each followed by one blank line, and ends with a single
//! `summary:` line without a trailing newline. Blocks with nothing to show are
//! left out, so a bare page only has `meta`, `context` and `summary`.
//!
//! ## Design Philosophy
//!
//! - **Token Efficiency**: No braces or brackets beyond the count markers
//! - **Honest Counts**: `name[N]:` always equals the number of entries below it
//! - **Stable Output**: Order is document order or an explicit sort, never
//!   hash order
//!
//! # Blocks
//!
//! ## meta
//!
//! ```text
//! meta:
//!   path: /docs/intro
//!   name: Intro
//!   desc: "Getting started: the basics"
//!   url: https://docs.example.com/docs/intro
//!   type: documentation
//!   format: toon/3.3
//! ```
//!
//! `desc` is omitted when empty and `url` when the site has no base URL.
//!
//! ## context
//!
//! ```text
//! context: 12-page docs site
//! relatedPages[5]:
//!   Button: /components/button
//! ```
//!
//! At most [`max_related_pages`](crate::ToonOptions::max_related_pages)
//! entries, registry order, the current page excluded.
//!
//! ## sections
//!
//! ```text
//! sections[2]:
//!   1. [2] Installation
//!      > Install the package with pip and import it in your application module.
//!   2. [3] Configuration
//!      First line of a longer snippet.
//!      Second line.
//! ```
//!
//! Only sections with prose or directives are listed. The snippet is the
//! section body after [`compress_section_content`](crate::compress_section_content).
//! Snippets of 50 characters or less are dropped, single-line snippets up to
//! 100 characters use the `>` form, anything longer shows its first 3 lines.
//!
//! ## directives
//!
//! ```text
//! directives:
//!   source: [app.py, layout.py]
//!   exec: [docs.a, docs.b, ...] (7 total)
//!   toc: [(none)]
//! ```
//!
//! One line per directive kind in first-seen order, each target once. More
//! than three targets collapse to the first two and a total.
//!
//! ## execComponents
//!
//! ```text
//! execComponents[2]:
//!   - docs.counter [callback]
//!   - docs.static_layout
//! ```
//!
//! ## codeExamples
//!
//! ```text
//! codeExamples[1]:
//!   1:
//!     file: app.py
//!     lang: python
//!     code: |
//!       from dash import Dash
//!       # ... (12 more lines)
//! ```
//!
//! Code goes through [`compress_code`](crate::compress_code) with structure
//! preservation on.
//!
//! ## tables and keyLists
//!
//! ```text
//! tables[1]:
//!   1. [Prop|Type]
//!      size|str
//!
//! keyLists[1]:
//!   - ordered: Install, Configure, Run
//! ```
//!
//! Cells are cut to 50 characters and rows to 15 per table. Only lists with
//! more than two items appear, each showing at most 5 items of 60 characters.
//!
//! ## tips, bestPractices, patterns, resources
//!
//! ```text
//! tips[1]:
//!   1. Quick Start
//!      lang: bash
//!      code: |
//!        pip install dash
//!        python app.py
//!
//! bestPractices[1]:
//!   3. Keep callbacks small
//!      desc: Split large callbacks.
//!
//! patterns[1]:
//!   - Chained callbacks
//!     desc: One callback feeds another.
//!     lang: python
//!     code: |
//!       a = 1
//!
//! resources[1]:
//!   Dash Docs: https://dash.plotly.com
//! ```
//!
//! Best practices show their own number, which may skip values. A tip with
//! no heading close enough above it is labelled `(general)`.
//!
//! ## summary
//!
//! ```text
//! summary: Intro: | 2 sections | 1 exec components | 1 code examples | 1 tips | uses exec, source | 1 interactive components
//! ```
//!
//! Counts follow block order, then the sorted directive kinds, then the number
//! of exec components that register callbacks.
//!
//! # Values
//!
//! Free-text values (names, descriptions, list items, tip contexts) go through
//! [`escape_toon_value`](crate::escape_toon_value):
//!
//! | Input | Output |
//! |-------|--------|
//! | `plain` | `plain` |
//! | empty | `""` |
//! | `a, b` | `"a, b"` |
//! | `it's` | `"it's"` |
//! | `say "hi"` | `"say \"hi\""` |
//!
//! Quoting triggers on a comma, colon, single or double quote, or a line
//! break. Inside quotes `\`, `"`, newline, carriage return and tab are
//! backslash-escaped.
