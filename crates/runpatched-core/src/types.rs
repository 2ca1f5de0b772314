//! Core types for runpatched
//!
//! Stage identities, the per-run patch configuration and the validated
//! color value that flows into the recolor and metrics stages.

use crate::error::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Color used when the caller does not supply one
pub const DEFAULT_TARGET_HEX: &str = "#D32F2F";

/// A `#RRGGBB` color, validated on construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Color as written, including the leading `#`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self(DEFAULT_TARGET_HEX.to_string())
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s
            .strip_prefix('#')
            .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ConfigError::InvalidColor(s.to_string()))
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Overrides applied to every stage of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// Value injected as `PROJECT_DIR`
    pub directory: PathBuf,
    /// Value injected as `target_hex`, when present
    pub target_hex: Option<HexColor>,
}

impl PatchConfig {
    /// Create config with only a directory override
    #[inline]
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            target_hex: None,
        }
    }

    /// With target color
    #[inline]
    #[must_use]
    pub fn with_target_hex(mut self, color: HexColor) -> Self {
        self.target_hex = Some(color);
        self
    }
}

/// Which overrides the patcher applies to one stage's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchFlags {
    /// Rewrite or insert `PROJECT_DIR`
    pub project_dir: bool,
    /// Rewrite `target_hex` if present
    pub target_color: bool,
    /// Drop notebook `!pip` lines
    pub strip_shell_escapes: bool,
}

/// The three pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    /// Mask generation
    Segmentation,
    /// Recoloring of segmented regions
    Recolor,
    /// Metrics over the recolored output
    Metrics,
}

impl StageKind {
    /// All stages, in execution order
    pub const ALL: [StageKind; 3] = [Self::Segmentation, Self::Recolor, Self::Metrics];

    /// Lowercase stage name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Segmentation => "segmentation",
            Self::Recolor => "recolor",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Stage identity
    pub kind: StageKind,
    /// File name of the source script, relative to the scripts directory
    pub script: &'static str,
    /// Overrides applied before execution
    pub flags: PatchFlags,
}

impl StageDescriptor {
    /// The standard pipeline: segmentation, recolor, metrics
    #[must_use]
    pub fn standard() -> [StageDescriptor; 3] {
        [
            StageDescriptor {
                kind: StageKind::Segmentation,
                script: "segmentation_masks.py",
                flags: PatchFlags {
                    project_dir: true,
                    target_color: false,
                    strip_shell_escapes: true,
                },
            },
            StageDescriptor {
                kind: StageKind::Recolor,
                script: "recolor.py",
                flags: PatchFlags {
                    project_dir: true,
                    target_color: true,
                    strip_shell_escapes: false,
                },
            },
            StageDescriptor {
                kind: StageKind::Metrics,
                script: "metrics.py",
                flags: PatchFlags {
                    project_dir: true,
                    target_color: true,
                    strip_shell_escapes: false,
                },
            },
        ]
    }

    /// Location of the unpatched source under `scripts_dir`
    #[inline]
    #[must_use]
    pub fn source_path(&self, scripts_dir: &Path) -> PathBuf {
        scripts_dir.join(self.script)
    }
}

/// A patched copy of a stage script inside the run workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedArtifact {
    /// Stage the artifact belongs to
    pub stage: StageKind,
    /// Location inside the workspace
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_six_digits() {
        let color: HexColor = "#AbCdEf".parse().unwrap();
        assert_eq!(color.as_str(), "#AbCdEf");
        assert_eq!(HexColor::default().as_str(), DEFAULT_TARGET_HEX);
    }

    #[test]
    fn hex_color_rejects_malformed() {
        for bad in ["D32F2F", "#D32F2", "#D32F2F0", "#GGGGGG", "", "#"] {
            assert_eq!(
                bad.parse::<HexColor>(),
                Err(ConfigError::InvalidColor(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn standard_stages_are_ordered() {
        let stages = StageDescriptor::standard();
        let kinds: Vec<_> = stages.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, StageKind::ALL);
        assert!(stages.iter().all(|s| s.flags.project_dir));
        assert!(stages[0].flags.strip_shell_escapes);
        assert!(!stages[0].flags.target_color);
        assert!(stages[1].flags.target_color && stages[2].flags.target_color);
    }

    #[test]
    fn stage_scripts_are_distinct() {
        let stages = StageDescriptor::standard();
        assert_ne!(stages[0].script, stages[1].script);
        assert_ne!(stages[1].script, stages[2].script);
        assert_ne!(stages[0].script, stages[2].script);
    }
}
