//! Advisory checks on the project root. Findings never block a run.

use std::fmt;
use std::path::{Path, PathBuf};

/// Segmentation model weights expected in the project root
pub const WEIGHTS_FILE: &str = "sam_vit_h_4b8939.pth";

/// Input images directory, relative to the project root
pub const IMAGES_DIR: [&str; 2] = ["data", "images"];

/// Something missing from the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightWarning {
    /// Model weights not found
    MissingWeights(PathBuf),
    /// Images directory not found
    MissingImagesDir(PathBuf),
}

impl fmt::Display for PreflightWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWeights(path) => write!(
                f,
                "SAM weights not found at {}. Segmentation will fail without them.",
                path.display()
            ),
            Self::MissingImagesDir(path) => write!(
                f,
                "{} does not exist. Create it and add images before running.",
                path.display()
            ),
        }
    }
}

/// Inspect `project_dir` for the files the stages expect
#[must_use]
pub fn check(project_dir: &Path) -> Vec<PreflightWarning> {
    let mut warnings = Vec::new();

    let weights = project_dir.join(WEIGHTS_FILE);
    if !weights.exists() {
        warnings.push(PreflightWarning::MissingWeights(weights));
    }

    let images: PathBuf = IMAGES_DIR.iter().fold(project_dir.to_path_buf(), |p, c| p.join(c));
    if !images.exists() {
        warnings.push(PreflightWarning::MissingImagesDir(images));
    }

    for warning in &warnings {
        tracing::debug!("{warning}");
    }
    warnings
}
