//! Size reduction for code and prose.
//!
//! - [`compress_code`] keeps a code listing under a line budget, preferring
//!   imports, definitions, decorators and callback wiring.
//! - [`compress_section_content`] strips directive residue from prose and cuts
//!   it at a sentence boundary under a character budget.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::blocks::truncate_chars;

static DIRECTIVE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\. \w+::").unwrap());
static OPTION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+:\w+:").unwrap());

const STRUCTURAL_PREFIXES: &[&str] = &[
    "import ",
    "from ",
    "def ",
    "async def ",
    "class ",
    "@",
    "component =",
    "fn ",
    "pub fn ",
    "function ",
    "export ",
];

const WIRING_MARKERS: &[&str] = &["Output(", "Input(", "State("];

/// Returns the elision marker appended to compressed code.
pub fn elision_marker(elided: usize) -> String {
    format!("# ... ({} more lines)", elided)
}

fn is_structural(line: &str) -> bool {
    let trimmed = line.trim_start();
    STRUCTURAL_PREFIXES.iter().any(|p| trimmed.starts_with(p))
        || WIRING_MARKERS.iter().any(|m| trimmed.contains(m))
}

/// Marks lines inside triple-quoted docstrings, which are never kept as filler.
fn docstring_lines(lines: &[&str]) -> Vec<bool> {
    let mut inside = false;
    let mut delimiter = "\"\"\"";
    lines
        .iter()
        .map(|line| {
            let trimmed = line.trim();
            if !inside {
                let found = ["\"\"\"", "'''"].into_iter().find(|d| trimmed.contains(d));
                match found {
                    Some(d) => {
                        delimiter = d;
                        inside = trimmed.matches(d).count() < 2;
                        true
                    }
                    None => false,
                }
            } else {
                if trimmed.contains(delimiter) {
                    inside = false;
                }
                true
            }
        })
        .collect()
}

/// Trims `code` to at most `max_lines` lines plus one elision marker line.
///
/// With `preserve_structure`, structural lines (imports, definitions,
/// decorators, callback wiring) are kept first and the remaining budget is
/// filled with the earliest other lines, in original order. Without it the
/// code is cut after `max_lines` lines.
///
/// # Examples
///
/// ```rust
/// use docs_toon::compress_code;
///
/// let code = (1..=25).map(|i| format!("x{} = {}", i, i)).collect::<Vec<_>>().join("\n");
/// let out = compress_code(&code, 20, true);
/// let lines: Vec<_> = out.lines().collect();
/// assert_eq!(lines.len(), 21);
/// assert_eq!(lines[20], "# ... (5 more lines)");
/// ```
pub fn compress_code(code: &str, max_lines: usize, preserve_structure: bool) -> String {
    // A final newline terminates the last line rather than starting another.
    let body = code.strip_suffix('\n').unwrap_or(code);
    let lines: Vec<&str> = body.split('\n').collect();
    if lines.len() <= max_lines {
        return code.to_string();
    }

    if !preserve_structure {
        let mut out = lines[..max_lines].join("\n");
        out.push('\n');
        out.push_str(&elision_marker(lines.len() - max_lines));
        return out;
    }

    let in_docstring = docstring_lines(&lines);
    let mut keep = vec![false; lines.len()];
    let mut kept = 0;

    for (i, line) in lines.iter().enumerate() {
        if kept == max_lines {
            break;
        }
        if !in_docstring[i] && is_structural(line) {
            keep[i] = true;
            kept += 1;
        }
    }
    for i in 0..lines.len() {
        if kept == max_lines {
            break;
        }
        if !keep[i] && !in_docstring[i] {
            keep[i] = true;
            kept += 1;
        }
    }

    let mut out: Vec<String> = lines
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(l, _)| l.to_string())
        .collect();
    out.push(elision_marker(lines.len() - kept));
    out.join("\n")
}

/// Removes directive residue and whitespace runs, then cuts at the last
/// sentence end or line break under `max_chars`.
///
/// Falls back to a hard cut plus `...` when no boundary lies past the
/// halfway point.
///
/// # Examples
///
/// ```rust
/// use docs_toon::compress_section_content;
///
/// let text = ".. exec::docs.example\n    :code: false\n\nFirst   sentence.\n\n\nSecond.";
/// assert_eq!(compress_section_content(text, 500), "First sentence.\nSecond.");
/// ```
pub fn compress_section_content(content: &str, max_chars: usize) -> String {
    let cleaned = content
        .lines()
        .filter(|l| !DIRECTIVE_LINE_RE.is_match(l) && !OPTION_LINE_RE.is_match(l))
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }

    let window = truncate_chars(&cleaned, max_chars);
    let boundary = window
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | '!' | '?' | '\n'))
        .map(|(i, _)| i)
        .last();

    match boundary {
        Some(idx) if window[..idx].chars().count() > max_chars / 2 => {
            window[..=idx].trim().to_string()
        }
        _ => format!("{}...", window.trim()),
    }
}
