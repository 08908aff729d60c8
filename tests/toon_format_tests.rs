use docs_toon::extract::{extract_directives, extract_resources, extract_tables};
use docs_toon::{
    compress_code, compress_section_content, extract_document, generate_documentation_toon,
    generate_documentation_toon_with_options, PageEntry, PageMeta, TableInfo, ToonOptions,
    DEFAULT_RESOURCE_DOMAINS,
};
use std::fs;

/// Every `name[N]:` header paired with the number of entries listed under it.
fn header_counts(toon: &str) -> Vec<(String, usize, usize)> {
    let lines: Vec<&str> = toon.lines().collect();
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(rest) = line.strip_suffix("]:") else {
            continue;
        };
        if line.starts_with(' ') {
            continue;
        }
        let Some((name, count)) = rest.split_once('[') else {
            continue;
        };
        let declared: usize = count.parse().unwrap();
        let listed = lines[i + 1..]
            .iter()
            .take_while(|l| l.starts_with(' '))
            .filter(|l| is_entry_line(name, l))
            .count();
        out.push((name.to_string(), declared, listed));
    }
    out
}

fn is_entry_line(block: &str, line: &str) -> bool {
    let Some(body) = line.strip_prefix("  ") else {
        return false;
    };
    if body.starts_with(' ') {
        return false;
    }
    match block {
        "relatedPages" | "resources" => true,
        "execComponents" | "keyLists" | "patterns" => body.starts_with("- "),
        _ => body.split_once(['.', ':']).is_some_and(|(n, _)| n.parse::<usize>().is_ok()),
    }
}

fn domains() -> Vec<String> {
    DEFAULT_RESOURCE_DOMAINS.iter().map(|d| d.to_string()).collect()
}

const RICH_PAGE: &str = "\
## Intro
This page walks through every construct the generator understands, one by one.

.. source::a.py
.. source::a.py
.. source::b.py
.. toc::

## Table
| A | B |
|---|---|
| 1 | 2 |
| 3 | 4 |

## Steps
- one
- two
- three
- four
- five
- six

## Example
```python
x = 1
y = 2
```

## Best Practices
### Use IDs
Give every component an id.
```python
html.Div(id='root')
html.Div(id='child')
```

## Patterns
### Fan out
One input, many outputs.
```python
a = 1
```

## Resources
- [Docs](https://dash.plotly.com/)
";

#[test]
fn test_output_is_deterministic() {
    let meta = PageMeta::new("/rich", "Rich");
    let registry = vec![PageEntry::new("/rich", "Rich"), PageEntry::new("/b", "B")];
    let first = generate_documentation_toon(&meta, RICH_PAGE, &registry);
    let second = generate_documentation_toon(&meta, RICH_PAGE, &registry);
    assert_eq!(first, second);
}

#[test]
fn test_header_counts_match_listed_items() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "print('a')\n").unwrap();
    fs::write(dir.path().join("b.py"), "print('b')\n").unwrap();
    let options = ToonOptions::new().with_source_root(dir.path());
    let registry: Vec<PageEntry> = (0..9)
        .map(|i| PageEntry::new(format!("/p{}", i), format!("Page {}", i)))
        .collect();

    let toon = generate_documentation_toon_with_options(
        &PageMeta::new("/rich", "Rich"),
        RICH_PAGE,
        &registry,
        &options,
    );

    let counts = header_counts(&toon);
    let names: Vec<_> = counts.iter().map(|(n, _, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "relatedPages",
            "sections",
            "codeExamples",
            "tables",
            "keyLists",
            "tips",
            "bestPractices",
            "patterns",
            "resources"
        ]
    );
    for (name, declared, listed) in counts {
        assert_eq!(declared, listed, "{} header disagrees with its entries", name);
    }
}

#[test]
fn test_source_deduplication_keeps_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "a = 1\n").unwrap();
    fs::write(dir.path().join("b.py"), "b = 2\n").unwrap();
    let doc = extract_document(RICH_PAGE, &ToonOptions::new().with_source_root(dir.path()));

    let files: Vec<_> = doc
        .code_examples
        .iter()
        .map(|e| e.source_file.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(files, vec!["a.py", "b.py"]);
}

#[test]
fn test_table_extraction() {
    let tables = extract_tables("| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n");
    assert_eq!(
        tables,
        vec![TableInfo {
            headers: vec!["A".into(), "B".into()],
            rows: vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        }]
    );
}

#[test]
fn test_code_compression_boundary() {
    let code: String = (1..=25)
        .map(|i| format!("value_{} = {}", i, i))
        .collect::<Vec<_>>()
        .join("\n");
    for preserve in [true, false] {
        let out = compress_code(&code, 20, preserve);
        let lines: Vec<_> = out.lines().collect();
        assert!(lines.len() <= 21);
        assert_eq!(lines.last(), Some(&"# ... (5 more lines)"));
    }
}

#[test]
fn test_source_files_with_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let lines = |n: usize| (1..=n).map(|i| format!("v{} = {}\n", i, i)).collect::<String>();
    fs::write(dir.path().join("long.py"), lines(25)).unwrap();
    fs::write(dir.path().join("exact.py"), lines(20)).unwrap();
    let options = ToonOptions::new().with_source_root(dir.path());

    let toon = generate_documentation_toon_with_options(
        &PageMeta::new("/files", "Files"),
        "## Files\n.. source::long.py\n.. source::exact.py\n",
        &Vec::<PageEntry>::new(),
        &options,
    );

    let long = toon.split("file: long.py").nth(1).unwrap();
    let long = long.split("file: exact.py").next().unwrap();
    assert!(long.contains("      v20 = 20\n      # ... (5 more lines)\n"));
    assert!(!long.contains("v21 = 21"));

    let exact = toon.split("file: exact.py").nth(1).unwrap();
    let exact = exact.split("\n\n").next().unwrap();
    assert!(exact.contains("      v20 = 20"));
    assert!(!exact.contains("more lines"));

    assert_eq!(compress_code(&lines(20), 20, true), lines(20));
    assert!(compress_code(&lines(25), 20, true).ends_with("# ... (5 more lines)"));
}

#[test]
fn test_best_practice_code_is_not_a_tip() {
    let toon = generate_documentation_toon(
        &PageMeta::new("/rich", "Rich"),
        RICH_PAGE,
        &Vec::<PageEntry>::new(),
    );
    let tips_block = toon
        .split("tips[")
        .nth(1)
        .and_then(|rest| rest.split("\n\n").next())
        .unwrap();
    let practices_block = toon
        .split("bestPractices[")
        .nth(1)
        .and_then(|rest| rest.split("\n\n").next())
        .unwrap();

    assert!(practices_block.contains("html.Div(id='root')"));
    assert!(!tips_block.contains("html.Div(id='root')"));
    assert!(tips_block.contains("x = 1"));
}

#[test]
fn test_content_truncates_after_sentence() {
    let mut paragraph = "w".repeat(479);
    paragraph.push('.');
    paragraph.push_str(&" tail".repeat(24));
    assert_eq!(paragraph.chars().count(), 600);

    let out = compress_section_content(&paragraph, 500);
    assert_eq!(out.chars().count(), 480);
    assert!(out.ends_with("w."));
}

#[test]
fn test_unknown_directive_is_dropped() {
    assert!(extract_directives(".. foobar::target\n").is_empty());
    let toon = generate_documentation_toon(
        &PageMeta::new("/x", "X"),
        "## A\n.. foobar::target\n",
        &Vec::<PageEntry>::new(),
    );
    assert!(!toon.contains("directives:"));
    assert!(!toon.contains("foobar"));
}

#[test]
fn test_resource_allow_list_outside_resources_section() {
    let md = "## Links elsewhere\n\nSee [Dash Docs](https://dash.plotly.com/docs) and [Example](https://example.com).\n";
    let resources = extract_resources("See [Dash Docs](https://dash.plotly.com/docs) and [Example](https://example.com).", &domains());
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].url, "https://dash.plotly.com/docs");

    // "Links elsewhere" is a Resources-like heading, so both links count there.
    assert_eq!(extract_resources(md, &domains()).len(), 2);
}

#[test]
fn test_escaped_values_in_output() {
    let meta = PageMeta::new("/q", "Quoting").with_description("Commas, colons: \"quotes\"");
    let toon = generate_documentation_toon(&meta, "", &Vec::<PageEntry>::new());
    assert!(toon.contains("  desc: \"Commas, colons: \\\"quotes\\\"\"\n"));
}
