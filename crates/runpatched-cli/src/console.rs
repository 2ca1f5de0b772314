//! Console progress output

use runpatched_core::{PipelineObserver, StageCommand, StageDescriptor};

/// Prints a line per stage, plus its command line when verbose
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub(crate) fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn started_lines(&self, stage: &StageDescriptor, command: &StageCommand) -> Vec<String> {
        let mut lines = vec![format!("\n▶ Running: {}", stage.script)];
        if self.verbose {
            lines.push(format!("    cmd: {command}"));
        }
        lines
    }
}

impl PipelineObserver for ConsoleObserver {
    fn stage_started(&self, stage: &StageDescriptor, command: &StageCommand) {
        for line in self.started_lines(stage, command) {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn command() -> StageCommand {
        StageCommand {
            program: "python3".into(),
            script: PathBuf::from("/tmp/runpatched_abc/recolor.py"),
        }
    }

    #[test]
    fn quiet_prints_stage_name_only() {
        let stage = &StageDescriptor::standard()[1];
        let lines = ConsoleObserver::new(false).started_lines(stage, &command());
        assert_eq!(lines, vec!["\n▶ Running: recolor.py".to_string()]);
    }

    #[test]
    fn verbose_adds_command_line() {
        let stage = &StageDescriptor::standard()[1];
        let lines = ConsoleObserver::new(true).started_lines(stage, &command());
        assert_eq!(lines[1], "    cmd: python3 /tmp/runpatched_abc/recolor.py");
    }
}
