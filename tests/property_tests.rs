//! Property-based tests for the generator's structural guarantees
//!
//! Markdown is assembled from a small vocabulary of building blocks so the
//! generated documents hit headings, fences, tables, lists and directives
//! often enough to matter.

use docs_toon::{
    compress_code, compress_section_content, escape_toon_value, extract_document,
    generate_documentation_toon, PageEntry, PageMeta, ToonOptions,
};
use proptest::prelude::*;

fn block() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ]{1,30}".prop_map(|t| format!("## {}\n", t.trim())),
        "[A-Za-z ]{1,30}".prop_map(|t| format!("### {}\n", t.trim())),
        "[A-Za-z,.:! ]{0,120}".prop_map(|t| format!("{}\n", t)),
        Just("\n".to_string()),
        Just(".. toc::\n".to_string()),
        "[a-z]{1,8}".prop_map(|m| format!(".. exec::docs.{}\n    :code: false\n", m)),
        "[a-z]{1,8}".prop_map(|f| format!(".. source::{}.py\n", f)),
        Just(".. foobar::x\n".to_string()),
        prop::collection::vec("[a-z]{1,10}", 1..6)
            .prop_map(|items| items.iter().map(|i| format!("- {}\n", i)).collect()),
        prop::collection::vec("[a-z =0-9]{1,20}", 0..20)
            .prop_map(|lines| format!("```python\n{}\n```\n", lines.join("\n"))),
        Just("| A | B |\n|---|---|\n| 1 | 2 |\n".to_string()),
        Just("## Best Practices\n### 1. First\nDo it.\n".to_string()),
        Just("## Resources\n- [Docs](https://dash.plotly.com/x)\n".to_string()),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 0..25).prop_map(|blocks| blocks.concat())
}

fn registry() -> Vec<PageEntry> {
    vec![PageEntry::new("/", "Home"), PageEntry::new("/page", "Page")]
}

proptest! {
    #[test]
    fn prop_generation_is_deterministic(md in document()) {
        let meta = PageMeta::new("/page", "Page");
        prop_assert_eq!(
            generate_documentation_toon(&meta, &md, &registry()),
            generate_documentation_toon(&meta, &md, &registry())
        );
    }

    #[test]
    fn prop_counted_headers_match_entries(md in document()) {
        let toon = generate_documentation_toon(&PageMeta::new("/page", "Page"), &md, &registry());
        let lines: Vec<&str> = toon.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            let Some(rest) = line.strip_suffix("]:") else { continue };
            if line.starts_with(' ') {
                continue;
            }
            let Some((name, count)) = rest.split_once('[') else { continue };
            let declared: usize = count.parse().unwrap();
            let entries = lines[i + 1..]
                .iter()
                .take_while(|l| l.starts_with(' '))
                .filter(|l| l.len() > 2 && !l[2..].starts_with(' '))
                .count();
            prop_assert_eq!(declared, entries, "block {}", name);
        }
    }

    #[test]
    fn prop_unknown_directives_never_extracted(md in document()) {
        let doc = extract_document(&md, &ToonOptions::default());
        prop_assert!(doc.directives.iter().all(|d| d.target != "x"));
    }

    #[test]
    fn prop_compress_code_respects_budget(
        lines in prop::collection::vec("[a-z =()@:]{0,30}", 0..60),
        max in 1usize..30,
        preserve in any::<bool>(),
    ) {
        let code = lines.join("\n");
        let out = compress_code(&code, max, preserve);
        let total = code.strip_suffix('\n').unwrap_or(&code).split('\n').count();
        if total <= max {
            prop_assert_eq!(out, code);
        } else {
            let kept: Vec<&str> = out.split('\n').collect();
            prop_assert_eq!(kept.len(), max + 1);
            let marker = format!("# ... ({} more lines)", total - max);
            prop_assert_eq!(kept[max], marker.as_str());
        }
    }

    #[test]
    fn prop_section_content_within_budget(text in "[a-zé. \n]{0,400}", max in 10usize..200) {
        let out = compress_section_content(&text, max);
        prop_assert!(out.chars().count() <= max + 3);
        prop_assert!(!out.contains("\n\n"));
    }

    #[test]
    fn prop_escaped_values_are_single_line(value in "[ -~\n\t]{0,40}") {
        let escaped = escape_toon_value(&value);
        prop_assert!(!escaped.contains('\n'));
        if escaped != value {
            prop_assert!(escaped.len() >= 2);
            prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
        }
    }
}
