//! Line-level helpers that keep the original line terminators intact

use once_cell::sync::Lazy;
use regex::Regex;

// PEP 263 encoding declaration, honored on the first two lines only
static CODING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\f]*#.*?coding[:=][ \t]*[-_.a-zA-Z0-9]+").expect("valid coding pattern")
});

/// Insert `line` after a leading `#!` line and encoding declaration.
pub(super) fn insert_after_preamble(text: &str, line: &str) -> String {
    let newline = detect_newline(text);
    let offset: usize = text
        .split_inclusive('\n')
        .enumerate()
        .take_while(|(index, l)| is_preamble(*index, l))
        .map(|(_, l)| l.len())
        .sum();
    let (head, tail) = text.split_at(offset);

    let mut out = String::with_capacity(text.len() + line.len() + 2 * newline.len());
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') {
        out.push_str(newline);
    }
    out.push_str(line);
    if !tail.is_empty() || text.ends_with('\n') {
        out.push_str(newline);
    }
    out.push_str(tail);
    out
}

fn is_preamble(index: usize, line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    match index {
        0 => line.starts_with("#!") || CODING_RE.is_match(line),
        1 => CODING_RE.is_match(line),
        _ => false,
    }
}

fn detect_newline(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}
