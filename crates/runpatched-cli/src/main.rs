//! `runpatched`: patch and run the segmentation → recolor → metrics pipeline

mod cli;
mod console;
mod logging;

use anyhow::{Context, Result};
use cli::CliArgs;
use console::ConsoleObserver;
use runpatched_core::config::{default_scripts_dir, resolve_project_dir};
use runpatched_core::{preflight, Pipeline, PipelineConfig, PipelineError, RunSummary};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    let args = CliArgs::from_matches(&matches);
    logging::init(args.verbose);

    match run(args) {
        Ok(summary) => {
            tracing::debug!(stages = summary.completed.len(), "run complete");
            println!("\n✅ Pipeline finished.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            let code = err
                .downcast_ref::<PipelineError>()
                .map_or(1, PipelineError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(args: CliArgs) -> Result<RunSummary> {
    let cwd = std::env::current_dir().context("reading current working directory")?;
    let project_dir = resolve_project_dir(args.project_dir.as_deref(), &cwd);
    if args.project_dir.is_none() {
        println!(
            "[INFO] --project_dir not provided; using current working directory: {}",
            project_dir.display()
        );
    }

    let scripts_dir = match args.scripts_dir {
        Some(dir) => dir,
        None => default_scripts_dir().context("locating stage scripts")?,
    };

    let config = PipelineConfig::new(project_dir, scripts_dir)
        .with_interpreter(args.python)
        .with_target_hex(args.target_hex)
        .with_verbose(args.verbose);
    config.validate().map_err(PipelineError::from)?;

    for warning in preflight::check(&config.project_dir) {
        println!("[WARN] {warning}");
    }

    // The child receives SIGINT from the terminal; the orchestrator stays up
    // so the run aborts normally and the workspace is dropped.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing interrupt handler")?;

    let observer = Arc::new(ConsoleObserver::new(config.verbose));
    let summary = Pipeline::new(config)
        .with_observer(observer)
        .with_interrupt(interrupted)
        .run()?;
    Ok(summary)
}
