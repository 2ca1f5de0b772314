//! Command-line surface

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use runpatched_core::{HexColor, DEFAULT_INTERPRETER, DEFAULT_TARGET_HEX};
use std::path::PathBuf;

/// Parsed command-line arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliArgs {
    pub(crate) project_dir: Option<PathBuf>,
    pub(crate) target_hex: HexColor,
    pub(crate) scripts_dir: Option<PathBuf>,
    pub(crate) python: String,
    pub(crate) verbose: bool,
}

impl CliArgs {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            project_dir: matches.get_one::<PathBuf>("project_dir").cloned(),
            target_hex: matches
                .get_one::<HexColor>("target_hex")
                .cloned()
                .unwrap_or_default(),
            scripts_dir: matches.get_one::<PathBuf>("scripts-dir").cloned(),
            python: matches
                .get_one::<String>("python")
                .cloned()
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string()),
            verbose: matches.get_flag("verbose"),
        }
    }
}

fn parse_hex(value: &str) -> Result<HexColor, runpatched_core::ConfigError> {
    value.parse()
}

pub(crate) fn command() -> Command {
    Command::new("runpatched")
        .version(runpatched_core::VERSION)
        .about("Run full pipeline: Segmentation → Recoloring → Metrics (all stages run)")
        .arg(
            Arg::new("project_dir")
                .long("project_dir")
                .alias("project-dir")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Path to project root (defaults to current working directory)"),
        )
        .arg(
            Arg::new("target_hex")
                .long("target_hex")
                .alias("target-hex")
                .value_name("COLOR")
                .default_value(DEFAULT_TARGET_HEX)
                .value_parser(parse_hex)
                .help("Target color for recoloring, e.g., \"#D32F2F\""),
        )
        .arg(
            Arg::new("scripts-dir")
                .long("scripts-dir")
                .env("RUNPATCHED_SCRIPTS_DIR")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Directory containing the stage scripts (defaults to the executable's directory)"),
        )
        .arg(
            Arg::new("python")
                .long("python")
                .env("RUNPATCHED_PYTHON")
                .value_name("PROGRAM")
                .default_value(DEFAULT_INTERPRETER)
                .help("Interpreter used to run the patched scripts"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Print subprocess commands"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        let argv = std::iter::once("runpatched").chain(args.iter().copied());
        command()
            .try_get_matches_from(argv)
            .map(|m| CliArgs::from_matches(&m))
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn defaults_apply() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.project_dir, None);
        assert_eq!(args.target_hex.as_str(), "#D32F2F");
        assert!(!args.verbose);
    }

    #[test]
    fn both_flag_spellings_accepted() {
        let snake = parse(&["--project_dir", "/p", "--target_hex", "#ABCDEF", "--verbose"]).unwrap();
        let kebab = parse(&["--project-dir", "/p", "--target-hex", "#ABCDEF", "-v"]).unwrap();
        assert_eq!(snake.project_dir, Some(PathBuf::from("/p")));
        assert_eq!(snake.target_hex.as_str(), "#ABCDEF");
        assert!(snake.verbose);
        assert_eq!(snake.project_dir, kebab.project_dir);
        assert_eq!(snake.target_hex, kebab.target_hex);
        assert_eq!(snake.verbose, kebab.verbose);
    }

    #[test]
    fn invalid_color_is_usage_error() {
        let err = parse(&["--target_hex", "red"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
