//! Check command implementation

use std::path::{Path, PathBuf};

use lintel_core::{Linter, export_fixes};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::commands::{builtin_registry, load_config};
use crate::output::output_run;

/// Arguments of `lintel check`.
pub struct CheckArgs<'a> {
    pub paths: &'a [PathBuf],
    pub checks: Option<&'a str>,
    pub fix: bool,
    pub export_fixes: Option<&'a Path>,
    pub warnings_as_errors: bool,
    pub format: OutputFormat,
}

/// Lints `paths`, optionally exporting and applying fixes.
///
/// Returns true if an error was displayed or a file failed.
pub fn run_check(cli: &Cli, options: &CheckArgs<'_>) -> Result<bool> {
    let mut config = load_config(cli, options.checks)?;
    if options.warnings_as_errors {
        config.warnings_as_errors = true;
    }

    let linter = Linter::new(config, builtin_registry()?).into_diagnostic()?;
    let files = linter.discover_files(options.paths);
    let mut run = linter.lint_files(&files).into_diagnostic()?;

    if let Some(path) = options.export_fixes {
        export_fixes(path, &run.diagnostics).into_diagnostic()?;
    }

    let outcome = linter.apply_fixes(&mut run, options.fix);
    if options.fix {
        info!("Applied {} of {} fixes", outcome.applied, outcome.offered);
    }

    output_run(
        &run,
        options.fix.then_some(&outcome),
        linter.sources(),
        options.format,
    )?;

    Ok(run.has_errors())
}
