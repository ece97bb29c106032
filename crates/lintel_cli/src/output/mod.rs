//! Output formatting module

mod json;
mod text;

use lintel_core::{FixOutcome, LintRun, SourceMap};
use miette::Result;

use crate::cli::OutputFormat;

/// Prints a finished run. `outcome` is set when fixes were requested.
pub fn output_run(
    run: &LintRun,
    outcome: Option<&FixOutcome>,
    sources: &SourceMap,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(run, outcome),
        OutputFormat::Text => text::output_text(run, outcome, sources),
    }
}
