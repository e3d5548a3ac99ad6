mod commands;
mod logging;
mod progress;

use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, TargetArgs};
use dotenv::dotenv;
use name_tidy_core::{AppConfig, Mode, ReconcileEngine, Task};
use progress::CliReporter;
use tracing::error;

fn main() {
    dotenv().ok();

    let guard = logging::init_logger();

    let config = match name_tidy_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            drop(guard);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let (task, target) = match args.command {
        Some(Commands::Duplicates(target)) => (Task::Duplicates, target),
        Some(Commands::Sidecars(target)) => (Task::Sidecars, target),
        Some(Commands::All(target)) => (Task::All, target),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            return;
        }
        None => {
            let _ = Cli::command().print_long_help();
            return;
        }
    };

    if let Err(err) = run_reconcile(config, task, &target) {
        error!("Error: {:#}", err);
        drop(guard);
        process::exit(1);
    }
}

fn run_reconcile(config: AppConfig, task: Task, target: &TargetArgs) -> Result<()> {
    let mode = if target.apply {
        Mode::Apply
    } else {
        Mode::Preview
    };

    let engine = ReconcileEngine::new(config);
    let reporter = CliReporter::new();
    let report = engine.run(&target.dir, task, mode, &reporter)?;

    let lines = report.render_lines();
    let (summary, body) = lines.split_last().map_or((None, &[][..]), |(last, rest)| {
        (Some(last), rest)
    });
    for line in body {
        println!("{}", paint(line));
    }
    if let Some(summary) = summary {
        println!();
        println!("{}", summary.bold());
    }
    if mode == Mode::Preview && !report.summary().is_clean() {
        println!("{}", "Preview only; re-run with --apply to make these changes.".dimmed());
    }

    Ok(())
}

fn paint(line: &str) -> ColoredString {
    if line.starts_with("[REMOVE]") || line.starts_with("  Error") {
        line.red()
    } else if line.starts_with("[SKIP]") {
        line.yellow()
    } else if line.starts_with("  ") {
        line.green()
    } else {
        line.normal()
    }
}
