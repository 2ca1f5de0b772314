//! Error types for runpatched
//!
//! Provides error handling for:
//! - Invalid run configuration (missing project root, bad colors)
//! - Reading stage sources and writing patched artifacts
//! - Launching stage processes and propagating their failures

use crate::pipeline::PipelineState;
use crate::types::StageKind;
use std::path::PathBuf;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration is invalid; the pipeline never started
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Stage source script could not be read
    #[error("failed to read {stage} source {}", .path.display())]
    ReadSource {
        /// Stage whose script was missing or unreadable
        stage: StageKind,
        /// Script location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Temporary workspace could not be created
    #[error("failed to create temporary workspace")]
    Workspace(#[source] std::io::Error),

    /// Patched artifact could not be written into the workspace
    #[error("failed to write patched artifact {}", .path.display())]
    WriteArtifact {
        /// Artifact location inside the workspace
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Interpreter could not be spawned
    #[error("failed to launch {stage} with {program}")]
    Spawn {
        /// Stage being launched
        stage: StageKind,
        /// Interpreter program
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Stage process exited unsuccessfully
    #[error("{stage} stage failed ({})", describe_exit(.code))]
    StageFailed {
        /// Stage that failed
        stage: StageKind,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Run was interrupted by the user
    #[error("interrupted during {stage} stage")]
    Interrupted {
        /// Stage running or about to run when the interrupt arrived
        stage: StageKind,
    },

    /// Orchestrator attempted an illegal state transition
    #[error("state machine error")]
    StateMachine(#[from] StateMachineError),
}

impl PipelineError {
    /// Check if error was raised before any stage ran
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Stage the error is attributed to, if any
    #[must_use]
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::ReadSource { stage, .. }
            | Self::Spawn { stage, .. }
            | Self::StageFailed { stage, .. }
            | Self::Interrupted { stage } => Some(*stage),
            _ => None,
        }
    }

    /// Process exit code the orchestrator should terminate with.
    ///
    /// A failing child's own code is reused when it fits in `1..=255`.
    /// An interrupted run exits with 130, as shells report SIGINT.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted { .. } => 130,
            Self::StageFailed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Project root does not exist on disk
    #[error("project_dir not found: {}", .0.display())]
    ProjectDirNotFound(PathBuf),

    /// Color is not `#` followed by six hex digits
    #[error("invalid target color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    /// Project root cannot be written into a script as text
    #[error("project_dir is not valid UTF-8: {}", .0.display())]
    NonUtf8ProjectDir(PathBuf),

    /// Interpreter program is empty
    #[error("interpreter must not be empty")]
    EmptyInterpreter,
}

/// State machine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Transition not allowed from the current state
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: PipelineState,
        /// Requested state
        to: PipelineState,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failure_display() {
        let err = PipelineError::StageFailed {
            stage: StageKind::Recolor,
            code: Some(3),
        };
        assert_eq!(err.to_string(), "recolor stage failed (exit status 3)");

        let err = PipelineError::StageFailed {
            stage: StageKind::Metrics,
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn exit_code_reuses_child_code() {
        let failed = |code| PipelineError::StageFailed {
            stage: StageKind::Segmentation,
            code,
        };
        assert_eq!(failed(Some(3)).exit_code(), 3);
        assert_eq!(failed(Some(255)).exit_code(), 255);
        assert_eq!(failed(Some(256)).exit_code(), 1);
        assert_eq!(failed(Some(-1)).exit_code(), 1);
        assert_eq!(failed(None).exit_code(), 1);
    }

    #[test]
    fn interrupt_exits_like_sigint() {
        let err = PipelineError::Interrupted {
            stage: StageKind::Recolor,
        };
        assert_eq!(err.exit_code(), 130);
        assert_eq!(err.stage(), Some(StageKind::Recolor));
        assert_eq!(err.to_string(), "interrupted during recolor stage");
    }

    #[test]
    fn config_error_classification() {
        let err: PipelineError = ConfigError::ProjectDirNotFound(PathBuf::from("/nope")).into();
        assert!(err.is_config_error());
        assert_eq!(err.stage(), None);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "project_dir not found: /nope");
    }
}
