//! JSON output formatter

use lintel_core::{FixOutcome, LintRun};
use miette::{IntoDiagnostic, Result};

pub fn output_json(run: &LintRun, outcome: Option<&FixOutcome>) -> Result<()> {
    let mut output = serde_json::to_value(run).into_diagnostic()?;
    output["fixes"] = serde_json::to_value(outcome).into_diagnostic()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
