//! runpatched core
//!
//! Drives the segmentation → recolor → metrics image pipeline:
//! - Patches `PROJECT_DIR` and `target_hex` into copies of each stage script
//! - Writes the copies into a run-scoped temporary workspace
//! - Executes them one at a time, aborting on the first failure
//!
//! # Example
//!
//! ```rust,no_run
//! use runpatched_core::{Pipeline, PipelineConfig};
//!
//! # fn example() -> Result<(), runpatched_core::PipelineError> {
//! let config = PipelineConfig::new("/data/project", "/opt/stages")
//!     .with_target_hex("#D32F2F".parse()?);
//! let summary = Pipeline::new(config).run()?;
//! println!("completed {} stages", summary.completed.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod patch;
pub mod pipeline;
pub mod preflight;
pub mod runner;
pub mod types;
pub mod workspace;

pub use config::{PipelineConfig, DEFAULT_INTERPRETER};
pub use error::{ConfigError, PipelineError, StateMachineError};
pub use patch::patch;
pub use pipeline::{Pipeline, PipelineState, RunSummary};
pub use preflight::PreflightWarning;
pub use runner::{
    ExitOutcome, NoopObserver, PipelineObserver, ProcessLauncher, StageCommand, StageRunner,
    SystemLauncher,
};
pub use types::{
    HexColor, PatchConfig, PatchFlags, PatchedArtifact, StageDescriptor, StageKind,
    DEFAULT_TARGET_HEX,
};
pub use workspace::Workspace;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
