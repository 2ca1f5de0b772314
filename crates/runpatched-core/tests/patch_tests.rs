use pretty_assertions::assert_eq;
use proptest::prelude::*;
use runpatched_core::patch::{python_str_literal, replace_target_hex, strip_shell_escapes};
use runpatched_core::{patch, HexColor, PatchConfig, PatchFlags};

fn dir_flags() -> PatchFlags {
    PatchFlags {
        project_dir: true,
        ..PatchFlags::default()
    }
}

// Lines that are never an assignment target nor a preamble line.
fn body_line() -> impl Strategy<Value = String> {
    "[a-z_][a-z_ =\"'0-9#()]{0,24}"
}

fn directory() -> impl Strategy<Value = String> {
    "/[A-Za-z0-9_ ./\\\\$]{0,30}"
}

#[test]
fn quoted_assignment_rewrites_directory() {
    let config = PatchConfig::new("/new/proj");
    let out = patch("PROJECT_DIR = \"/old\"\n", &config, dir_flags());
    assert_eq!(out, "PROJECT_DIR = r\"/new/proj\"\n");
}

#[test]
fn windows_path_survives_verbatim() {
    let config = PatchConfig::new(r"C:\Users\me\$HOME\proj");
    let out = patch("x = 1\nPROJECT_DIR = \"/old\"\n", &config, dir_flags());
    assert_eq!(out, "x = 1\nPROJECT_DIR = r\"C:\\Users\\me\\$HOME\\proj\"\n");
}

#[test]
fn color_rewrite_leaves_rest_alone() {
    let color: HexColor = "#112233".parse().unwrap();
    let config = PatchConfig::new("/p").with_target_hex(color);
    let flags = PatchFlags {
        target_color: true,
        ..PatchFlags::default()
    };
    let src = "import cv2\ntarget_hex = \"#AABBCC\"\ndef f():\n    return target_hex\n";
    assert_eq!(
        patch(src, &config, flags),
        "import cv2\ntarget_hex = \"#112233\"\ndef f():\n    return target_hex\n"
    );
}

proptest! {
    #[test]
    fn prop_existing_assignment_is_only_change(
        lines in prop::collection::vec(body_line(), 0..12),
        at in 0usize..12,
        old in "[a-z/]{0,10}",
        dir in directory(),
    ) {
        let at = at.min(lines.len());
        let mut input = lines.clone();
        input.insert(at, format!("PROJECT_DIR = \"{old}\""));
        let text = input.join("\n") + "\n";

        let out = patch(&text, &PatchConfig::new(&dir), dir_flags());

        let mut expected = lines;
        expected.insert(at, format!("PROJECT_DIR = {}", python_str_literal(&dir)));
        prop_assert_eq!(out, expected.join("\n") + "\n");
    }

    #[test]
    fn prop_missing_assignment_is_inserted_once(
        lines in prop::collection::vec(body_line(), 0..12),
        shebang in any::<bool>(),
        coding in any::<bool>(),
        dir in directory(),
    ) {
        let mut preamble = String::new();
        if shebang {
            preamble.push_str("#!/usr/bin/env python3\n");
        }
        if coding {
            preamble.push_str("# -*- coding: utf-8 -*-\n");
        }
        let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let text = format!("{preamble}{body}");

        let out = patch(&text, &PatchConfig::new(&dir), dir_flags());

        let assignment = format!("PROJECT_DIR = {}", python_str_literal(&dir));
        let expected = if text.is_empty() {
            assignment
        } else {
            format!("{preamble}{assignment}\n{body}")
        };
        prop_assert_eq!(&out, &expected);
        prop_assert_eq!(out.matches("PROJECT_DIR = ").count(), 1);
    }

    #[test]
    fn prop_target_hex_replaced_with_configured_color(
        before in prop::collection::vec(body_line(), 0..6),
        after in prop::collection::vec(body_line(), 0..6),
        old in "#[0-9A-Fa-f]{6}",
        new in "#[0-9A-Fa-f]{6}",
    ) {
        let text = [before.clone(), vec![format!("target_hex = \"{old}\"")], after.clone()]
            .concat()
            .join("\n");
        let expected = [before, vec![format!("target_hex = \"{new}\"")], after]
            .concat()
            .join("\n");
        prop_assert_eq!(replace_target_hex(&text, &new), expected);
    }

    #[test]
    fn prop_target_hex_absent_is_noop(
        lines in prop::collection::vec(body_line(), 0..12),
        new in "#[0-9A-Fa-f]{6}",
    ) {
        let text = lines.join("\n");
        prop_assert_eq!(replace_target_hex(&text, &new), text);
    }

    #[test]
    fn prop_strip_keeps_other_lines_in_order(
        lines in prop::collection::vec(
            prop_oneof![
                body_line(),
                "[ \t]{0,3}!pip install [a-z]{1,8}",
                Just(String::new()),
            ],
            0..16,
        ),
    ) {
        let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let expected: String = lines
            .iter()
            .filter(|l| !l.trim_start().starts_with("!pip"))
            .map(|l| format!("{l}\n"))
            .collect();
        prop_assert_eq!(strip_shell_escapes(&text), expected);
    }
}
