//! Configuration patcher
//!
//! Rewrites module-level assignments in stage script text. Only
//! unindented assignments at the start of a line are considered, so
//! bindings nested inside functions or blocks are left alone.
//!
//! The patcher never fails: a missing `PROJECT_DIR` is inserted, a missing
//! `target_hex` is skipped.

mod literal;
mod lines;

pub use literal::python_str_literal;

use crate::types::{PatchConfig, PatchFlags};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Variable receiving the project directory
pub const PROJECT_DIR_VAR: &str = "PROJECT_DIR";

/// Variable receiving the target color
pub const TARGET_HEX_VAR: &str = "target_hex";

/// Notebook escape for package installs
pub const SHELL_ESCAPE_MARKER: &str = "!pip";

static PROJECT_DIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^PROJECT_DIR[ \t]*=[ \t]*["'].*?["']"#).expect("valid PROJECT_DIR pattern")
});

static TARGET_HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^target_hex[ \t]*=[ \t]*["']#[0-9A-Fa-f]{6}["']"#)
        .expect("valid target_hex pattern")
});

/// Apply the configured overrides to `text`.
///
/// Overrides run in a fixed order: project directory, target color, then
/// shell-escape stripping.
#[must_use]
pub fn patch(text: &str, config: &PatchConfig, flags: PatchFlags) -> String {
    let mut out = text.to_string();

    if flags.project_dir {
        let literal = python_str_literal(&config.directory.to_string_lossy());
        out = set_project_dir(&out, &literal);
    }

    if flags.target_color {
        if let Some(color) = &config.target_hex {
            out = replace_target_hex(&out, color.as_str());
        }
    }

    if flags.strip_shell_escapes {
        out = strip_shell_escapes(&out);
    }

    out
}

/// Rewrite every top-level `PROJECT_DIR = "..."`, or insert one if there is none.
///
/// `value_literal` is inserted verbatim as the right-hand side.
#[must_use]
pub fn set_project_dir(text: &str, value_literal: &str) -> String {
    let assignment = format!("{PROJECT_DIR_VAR} = {value_literal}");
    let matches = PROJECT_DIR_RE.find_iter(text).count();
    if matches > 0 {
        tracing::debug!(matches, "rewriting {PROJECT_DIR_VAR}");
        return PROJECT_DIR_RE
            .replace_all(text, NoExpand(&assignment))
            .into_owned();
    }

    tracing::debug!("{PROJECT_DIR_VAR} not found, inserting");
    lines::insert_after_preamble(text, &assignment)
}

/// Rewrite every top-level `target_hex = "#RRGGBB"`. No-op when absent.
#[must_use]
pub fn replace_target_hex(text: &str, color: &str) -> String {
    let assignment = format!("{TARGET_HEX_VAR} = \"{color}\"");
    let replaced = TARGET_HEX_RE.replace_all(text, NoExpand(&assignment));
    if matches!(replaced, std::borrow::Cow::Borrowed(_)) {
        tracing::debug!("{TARGET_HEX_VAR} not found, skipping");
    }
    replaced.into_owned()
}

/// Drop every line whose left-trimmed content starts with `!pip`.
#[must_use]
pub fn strip_shell_escapes(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.trim_start().starts_with(SHELL_ESCAPE_MARKER))
        .collect()
}
