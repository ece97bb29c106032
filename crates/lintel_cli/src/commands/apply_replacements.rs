//! Apply-replacements command implementation

use std::path::Path;

use lintel_core::apply_replacements;
use miette::{IntoDiagnostic, Result};

use crate::commands::display_path;

/// Merges the replacement documents in `dir` into their files.
///
/// Returns true if a file had conflicts or could not be processed.
pub fn run_apply_replacements(dir: &Path, remove_documents: bool) -> Result<bool> {
    let report = apply_replacements(dir, remove_documents).into_diagnostic()?;

    for conflict in &report.conflicts {
        let first = conflict.first.span();
        let second = conflict.second.span();
        println!(
            "{}: error: conflicting replacements at [{}, {}) and [{}, {}); file left unchanged",
            display_path(&conflict.file),
            first.start,
            first.end,
            second.start,
            second.end
        );
    }
    for (path, message) in &report.errors {
        println!("{}: error: {}", display_path(path), message);
    }

    println!(
        "Applied replacements from {} documents to {} files",
        report.documents.len(),
        report.applied_files.len()
    );
    Ok(!report.is_clean())
}
