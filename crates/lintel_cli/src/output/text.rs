//! Text output formatter

use std::io;

use lintel_core::{ErrorReporter, FixOutcome, LintRun, SourceMap};
use miette::{IntoDiagnostic, Result};

pub fn output_text(run: &LintRun, outcome: Option<&FixOutcome>, sources: &SourceMap) -> Result<()> {
    let stdout = io::stdout();
    let mut reporter = ErrorReporter::new(stdout.lock(), sources);

    reporter
        .report_all(&run.diagnostics, outcome)
        .into_diagnostic()?;
    for (path, error) in &run.failures {
        reporter.report_failure(path, error).into_diagnostic()?;
    }
    reporter.finish(outcome).into_diagnostic()
}
