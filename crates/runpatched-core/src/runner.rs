//! Stage runner
//!
//! Patches one stage script, writes it into the run workspace and executes
//! it with the configured interpreter. The child's stdout and stderr are
//! inherited so the wrapped script's diagnostics appear verbatim.

use crate::error::PipelineError;
use crate::patch;
use crate::types::{PatchConfig, PatchedArtifact, StageDescriptor, StageKind};
use crate::workspace::Workspace;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::Arc;

/// Command line used to launch one patched artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    /// Interpreter program
    pub program: String,
    /// Patched script passed as the only argument
    pub script: PathBuf,
}

impl StageCommand {
    /// Build the equivalent `std::process::Command`
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.script);
        cmd
    }
}

impl fmt::Display for StageCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.script.display())
    }
}

/// How a stage process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    /// Successful exit
    pub const SUCCESS: ExitOutcome = ExitOutcome { code: Some(0) };

    /// Exit with the given code
    #[inline]
    #[must_use]
    pub fn code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the process exited with status zero
    #[inline]
    #[must_use]
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Launches stage processes and blocks until they exit.
pub trait ProcessLauncher: Send + Sync {
    /// Run `command` to completion
    fn launch(&self, stage: StageKind, command: &StageCommand) -> io::Result<ExitOutcome>;
}

/// Launcher backed by `std::process::Command` with inherited stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, _stage: StageKind, command: &StageCommand) -> io::Result<ExitOutcome> {
        let status = command.to_command().status()?;
        Ok(status.into())
    }
}

/// Receives progress notifications from the runner.
///
/// All methods default to doing nothing.
pub trait PipelineObserver: Send + Sync {
    /// A stage is about to be launched
    fn stage_started(&self, _stage: &StageDescriptor, _command: &StageCommand) {}

    /// A stage exited successfully
    fn stage_finished(&self, _stage: &StageDescriptor) {}

    /// A stage failed; the pipeline is aborting
    fn stage_failed(&self, _stage: &StageDescriptor, _error: &PipelineError) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Runs individual stages
pub struct StageRunner {
    interpreter: String,
    scripts_dir: PathBuf,
    launcher: Arc<dyn ProcessLauncher>,
    observer: Arc<dyn PipelineObserver>,
}

impl StageRunner {
    /// Create a runner that launches real processes
    pub fn new(interpreter: impl Into<String>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            scripts_dir: scripts_dir.into(),
            launcher: Arc::new(SystemLauncher),
            observer: Arc::new(NoopObserver),
        }
    }

    /// With custom process launcher
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// With progress observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Directory the unpatched scripts are read from
    #[inline]
    #[must_use]
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Command that would launch `artifact`
    #[must_use]
    pub fn command_for(&self, artifact: &PatchedArtifact) -> StageCommand {
        StageCommand {
            program: self.interpreter.clone(),
            script: artifact.path.clone(),
        }
    }

    /// Patch, materialize and execute one stage.
    ///
    /// # Errors
    /// Returns `PipelineError` if:
    /// - The source script cannot be read
    /// - The artifact cannot be written
    /// - The interpreter cannot be spawned
    /// - The child exits unsuccessfully
    pub fn run_stage(
        &self,
        stage: &StageDescriptor,
        workspace: &Workspace,
        config: &PatchConfig,
    ) -> Result<PatchedArtifact, PipelineError> {
        let result = self.try_run_stage(stage, workspace, config);
        match &result {
            Ok(_) => self.observer.stage_finished(stage),
            Err(err) => self.observer.stage_failed(stage, err),
        }
        result
    }

    fn try_run_stage(
        &self,
        stage: &StageDescriptor,
        workspace: &Workspace,
        config: &PatchConfig,
    ) -> Result<PatchedArtifact, PipelineError> {
        let source_path = stage.source_path(&self.scripts_dir);
        let source = fs::read_to_string(&source_path).map_err(|source| PipelineError::ReadSource {
            stage: stage.kind,
            path: source_path.clone(),
            source,
        })?;

        let patched = patch::patch(&source, config, stage.flags);
        let artifact = workspace.write_artifact(stage, &patched)?;

        let command = self.command_for(&artifact);
        self.observer.stage_started(stage, &command);
        tracing::info!(stage = %stage.kind, command = %command, "running stage");

        let outcome = self
            .launcher
            .launch(stage.kind, &command)
            .map_err(|source| PipelineError::Spawn {
                stage: stage.kind,
                program: command.program.clone(),
                source,
            })?;

        if !outcome.success() {
            tracing::debug!(stage = %stage.kind, code = ?outcome.code, "stage failed");
            return Err(PipelineError::StageFailed {
                stage: stage.kind,
                code: outcome.code,
            });
        }

        tracing::info!(stage = %stage.kind, "stage completed");
        Ok(artifact)
    }
}

impl fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRunner")
            .field("interpreter", &self.interpreter)
            .field("scripts_dir", &self.scripts_dir)
            .finish_non_exhaustive()
    }
}
