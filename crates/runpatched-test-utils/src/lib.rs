//! Testing utilities for runpatched workspace
//!
//! Shared fixtures: dummy stage scripts on disk and a launcher that records
//! what would have been executed instead of spawning processes.

#![allow(missing_docs)]

use runpatched_core::{ExitOutcome, PipelineConfig, ProcessLauncher, StageCommand, StageKind};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Script A: only a project directory
pub const SCRIPT_A: &str = "PROJECT_DIR = \"/old\"\n";

/// Script B: project directory and target color
pub const SCRIPT_B: &str = "PROJECT_DIR = \"/old\"\ntarget_hex = \"#000000\"\n";

/// Script C: neither assignment
pub const SCRIPT_C: &str = "import sys\nprint(sys.argv)\n";

/// One recorded launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub stage: StageKind,
    pub command: StageCommand,
    /// Artifact contents at launch time
    pub text: String,
}

/// Launcher that records launches and succeeds unless told otherwise
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launches: Mutex<Vec<Launch>>,
    failures: HashMap<StageKind, i32>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `stage` exit with `code`
    pub fn fail_on(mut self, stage: StageKind, code: i32) -> Self {
        self.failures.insert(stage, code);
        self
    }

    pub fn launches(&self) -> Vec<Launch> {
        self.launches.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<StageKind> {
        self.launches().into_iter().map(|l| l.stage).collect()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&self, stage: StageKind, command: &StageCommand) -> io::Result<ExitOutcome> {
        let text = fs::read_to_string(&command.script)?;
        self.launches.lock().unwrap().push(Launch {
            stage,
            command: command.clone(),
            text,
        });
        Ok(match self.failures.get(&stage) {
            Some(code) => ExitOutcome::code(*code),
            None => ExitOutcome::SUCCESS,
        })
    }
}

/// Project root and scripts directory for one test
pub struct Fixture {
    pub project: TempDir,
    pub scripts: TempDir,
}

impl Fixture {
    /// Scripts A, B, C as segmentation, recolor and metrics
    pub fn standard() -> Self {
        Self::with_scripts(SCRIPT_A, SCRIPT_B, SCRIPT_C)
    }

    pub fn with_scripts(segmentation: &str, recolor: &str, metrics: &str) -> Self {
        let project = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();
        fs::write(scripts.path().join("segmentation_masks.py"), segmentation).unwrap();
        fs::write(scripts.path().join("recolor.py"), recolor).unwrap();
        fs::write(scripts.path().join("metrics.py"), metrics).unwrap();
        Self { project, scripts }
    }

    pub fn script(&self, name: &str) -> PathBuf {
        self.scripts.path().join(name)
    }

    /// Config pointing at this fixture
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::new(self.project.path(), self.scripts.path())
    }
}
