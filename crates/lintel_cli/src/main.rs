//! lintel CLI
//!
//! Pluggable C-family linter with conflict-aware fix-its.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::apply_replacements::run_apply_replacements;
use crate::commands::check::{CheckArgs, run_check};
use crate::commands::list_checks::run_list_checks;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check {
            paths,
            checks,
            fix,
            export_fixes,
            warnings_as_errors,
            format,
        } => run_check(
            cli,
            &CheckArgs {
                paths,
                checks: checks.as_deref(),
                fix: *fix,
                export_fixes: export_fixes.as_deref(),
                warnings_as_errors: *warnings_as_errors,
                format: *format,
            },
        ),
        Commands::ListChecks { checks } => run_list_checks(cli, checks.as_deref()).map(|_| false),
        Commands::ApplyReplacements {
            dir,
            remove_change_desc_files,
        } => run_apply_replacements(dir, *remove_change_desc_files),
    }
}
