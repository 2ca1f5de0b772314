//! Python string literals for injected values

/// Render `value` as a Python string literal.
///
/// Raw strings (`r"..."`) keep Windows paths readable. A raw string cannot
/// contain `"` or a line break and cannot end in an odd number of
/// backslashes; such values fall back to an escaped literal.
#[must_use]
pub fn python_str_literal(value: &str) -> String {
    if raw_compatible(value) {
        return format!("r\"{value}\"");
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn raw_compatible(value: &str) -> bool {
    if value.contains(['"', '\n', '\r']) {
        return false;
    }
    let trailing = value.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 0
}
