//! Pipeline orchestration
//!
//! ```text
//!   Start → Segmentation → Recolor → Metrics → Done
//!              |failure     |failure   |failure
//!              └────────────┴──────────┴──────→ Aborted
//! ```
//!
//! Stages run strictly one after another. A later stage never starts once an
//! earlier one has failed, and the workspace is removed on every exit path.
//!
//! An optional interrupt flag is checked before each stage and consulted
//! when a stage fails, so a Ctrl-C handled by the caller ends the run through
//! the normal abort path instead of killing the process.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, StateMachineError};
use crate::runner::{PipelineObserver, ProcessLauncher, StageRunner};
use crate::types::{StageDescriptor, StageKind};
use crate::workspace::Workspace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Nothing has run yet
    Start,
    /// Segmentation stage running
    Segmentation,
    /// Recolor stage running
    Recolor,
    /// Metrics stage running
    Metrics,
    /// All stages succeeded
    Done,
    /// A stage failed
    Aborted,
}

impl PipelineState {
    /// State entered while `stage` runs
    #[must_use]
    pub fn running(stage: StageKind) -> Self {
        match stage {
            StageKind::Segmentation => Self::Segmentation,
            StageKind::Recolor => Self::Recolor,
            StageKind::Metrics => Self::Metrics,
        }
    }

    /// Whether no further transitions are possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// States reachable from `from`
pub fn allowed_transitions(from: PipelineState) -> Vec<PipelineState> {
    use PipelineState::*;
    match from {
        Start => vec![Segmentation],
        Segmentation => vec![Recolor, Aborted],
        Recolor => vec![Metrics, Aborted],
        Metrics => vec![Done, Aborted],
        Done => vec![],
        Aborted => vec![],
    }
}

/// Validates a state transition.
pub fn validate_transition(from: PipelineState, to: PipelineState) -> Result<(), StateMachineError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StateMachineError::IllegalTransition { from, to })
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Stages that completed, in order
    pub completed: Vec<StageKind>,
    /// Final state
    pub state: PipelineState,
}

/// Sequential three-stage pipeline
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    stages: [StageDescriptor; 3],
    runner: StageRunner,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Pipeline {
    /// Create pipeline running the standard stages with real processes
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        let runner = StageRunner::new(config.interpreter.clone(), config.scripts_dir.clone());
        Self {
            config,
            stages: StageDescriptor::standard(),
            runner,
            interrupt: None,
        }
    }

    /// With custom process launcher
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.runner = self.runner.with_launcher(launcher);
        self
    }

    /// With progress observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.runner = self.runner.with_observer(observer);
        self
    }

    /// With interrupt flag, set by the caller's signal handler
    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Run configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stages in execution order
    #[inline]
    #[must_use]
    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Run every stage in order.
    ///
    /// # Errors
    /// Returns `PipelineError` if the configuration is invalid (no stage
    /// runs), if any stage fails (later stages are skipped) or if the
    /// interrupt flag is raised.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        self.config.validate()?;

        let workspace = Workspace::create()?;
        let patch_config = self.config.patch_config();
        let mut state = PipelineState::Start;
        let mut completed = Vec::with_capacity(self.stages.len());

        tracing::info!(
            project_dir = %self.config.project_dir.display(),
            target_hex = %self.config.target_hex,
            "starting pipeline"
        );

        for stage in &self.stages {
            let next = PipelineState::running(stage.kind);
            validate_transition(state, next)?;
            state = next;

            let result = if self.interrupted() {
                Err(PipelineError::Interrupted { stage: stage.kind })
            } else {
                self.runner.run_stage(stage, &workspace, &patch_config)
            };

            if let Err(err) = result {
                let err = match err {
                    PipelineError::StageFailed { stage: kind, .. } if self.interrupted() => {
                        PipelineError::Interrupted { stage: kind }
                    }
                    other => other,
                };
                validate_transition(state, PipelineState::Aborted)?;
                tracing::warn!(stage = %stage.kind, error = %err, "pipeline aborted");
                return Err(err);
            }
            completed.push(stage.kind);
        }

        validate_transition(state, PipelineState::Done)?;
        tracing::info!("pipeline finished");
        Ok(RunSummary {
            completed,
            state: PipelineState::Done,
        })
    }
}
