//! Run configuration

use crate::error::ConfigError;
use crate::types::{HexColor, PatchConfig};
use std::io;
use std::path::{Path, PathBuf};

/// Interpreter used when none is configured
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Project root shared by all stages
    pub project_dir: PathBuf,
    /// Directory containing the unpatched stage scripts
    pub scripts_dir: PathBuf,
    /// Program used to execute patched scripts
    pub interpreter: String,
    /// Recolor target
    pub target_hex: HexColor,
    /// Report each stage's command line
    pub verbose: bool,
}

impl PipelineConfig {
    /// Create configuration with default interpreter and color
    #[inline]
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            scripts_dir: scripts_dir.into(),
            ..Self::default()
        }
    }

    /// With interpreter
    #[inline]
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// With target color
    #[inline]
    #[must_use]
    pub fn with_target_hex(mut self, color: HexColor) -> Self {
        self.target_hex = color;
        self
    }

    /// With verbosity
    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the configuration before any stage runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_dir.to_str().is_none() {
            return Err(ConfigError::NonUtf8ProjectDir(self.project_dir.clone()));
        }
        if !self.project_dir.exists() {
            return Err(ConfigError::ProjectDirNotFound(self.project_dir.clone()));
        }
        if self.interpreter.trim().is_empty() {
            return Err(ConfigError::EmptyInterpreter);
        }
        Ok(())
    }

    /// Overrides shared by every stage of the run
    #[must_use]
    pub fn patch_config(&self) -> PatchConfig {
        PatchConfig::new(&self.project_dir).with_target_hex(self.target_hex.clone())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            scripts_dir: PathBuf::from("."),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            target_hex: HexColor::default(),
            verbose: false,
        }
    }
}

/// Resolve the project root against `cwd`.
///
/// Existing paths are canonicalized; missing ones are only made absolute so
/// the error can name them.
#[must_use]
pub fn resolve_project_dir(requested: Option<&Path>, cwd: &Path) -> PathBuf {
    let Some(requested) = requested else {
        return cwd.to_path_buf();
    };
    let joined = cwd.join(requested);
    joined.canonicalize().unwrap_or(joined)
}

/// Directory holding the running executable, where the stage scripts ship
pub fn default_scripts_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.interpreter, "python3");
        assert_eq!(cfg.target_hex.as_str(), "#D32F2F");
        assert!(!cfg.verbose);
    }

    #[test]
    fn missing_project_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let cfg = PipelineConfig::new(&missing, dir.path());
        assert_eq!(cfg.validate(), Err(ConfigError::ProjectDirNotFound(missing)));

        let cfg = PipelineConfig::new(dir.path(), dir.path());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_project_dir_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = PathBuf::from(OsStr::from_bytes(b"/tmp/proj-\xff"));
        let cfg = PipelineConfig::new(&dir, "/scripts");
        assert_eq!(cfg.validate(), Err(ConfigError::NonUtf8ProjectDir(dir)));
    }

    #[test]
    fn empty_interpreter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig::new(dir.path(), dir.path()).with_interpreter("  ");
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyInterpreter));
    }

    #[test]
    fn patch_config_carries_directory_and_color() {
        let color: HexColor = "#ABCDEF".parse().unwrap();
        let cfg = PipelineConfig::new("/proj", "/scripts").with_target_hex(color.clone());
        let patch = cfg.patch_config();
        assert_eq!(patch.directory, PathBuf::from("/proj"));
        assert_eq!(patch.target_hex, Some(color));
    }

    #[test]
    fn project_dir_resolution() {
        let cwd = tempfile::tempdir().unwrap();
        let cwd = cwd.path().canonicalize().unwrap();
        std::fs::create_dir(cwd.join("proj")).unwrap();

        assert_eq!(resolve_project_dir(None, &cwd), cwd);
        assert_eq!(resolve_project_dir(Some(Path::new("proj")), &cwd), cwd.join("proj"));
        assert_eq!(resolve_project_dir(Some(Path::new("missing")), &cwd), cwd.join("missing"));
    }
}
