//! Run-scoped scratch directory for patched artifacts
//!
//! One workspace exists per run. Every stage writes its artifact into it and
//! the whole directory is removed when the workspace is dropped, on success
//! and on every error path.

use crate::error::PipelineError;
use crate::types::{PatchedArtifact, StageDescriptor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Prefix of the temporary directory name
pub const WORKSPACE_PREFIX: &str = "runpatched_";

/// Temporary directory holding the patched copies of the stage scripts
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under the system temp directory
    pub fn create() -> Result<Self, PipelineError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(PipelineError::Workspace)?;
        tracing::debug!(path = %dir.path().display(), "workspace created");
        Ok(Self { dir })
    }

    /// Workspace root
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` as the stage's artifact, named after its source script.
    ///
    /// A second write for the same stage replaces the first.
    pub fn write_artifact(
        &self,
        stage: &StageDescriptor,
        text: &str,
    ) -> Result<PatchedArtifact, PipelineError> {
        let path = self.path().join(stage.script);
        fs::write(&path, text).map_err(|source| PipelineError::WriteArtifact {
            path: path.clone(),
            source,
        })?;
        Ok(PatchedArtifact {
            stage: stage.kind,
            path,
        })
    }
}
