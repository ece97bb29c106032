//! Bridge to path-sensitive analyzers.
//!
//! An analyzer is an opaque producer of findings, each explained by a path
//! of steps. Its checkers share the check filter under the `analyzer-`
//! prefix, and every finding becomes an ordinary [`Diagnostic`] with one
//! note per path step and no edits.

use std::path::Path;

use lintel_ast::{LineIndex, SyntaxNode};
use lintel_plugin::{Diagnostic, Severity, SourceLocation};
use serde::{Deserialize, Serialize};

use crate::{ChecksFilter, LintelError};

/// Prefix distinguishing analyzer checker names in the filter space.
pub const ANALYZER_PREFIX: &str = "analyzer-";

/// One step of the path explaining a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPiece {
    /// Byte offset of the step.
    pub offset: u32,
    /// What happens at this step.
    pub message: String,
}

/// A finding reported by an analyzer checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDiagnostic {
    /// Checker name, without [`ANALYZER_PREFIX`].
    pub checker: String,
    /// Byte offset of the finding.
    pub offset: u32,
    /// Short description.
    pub message: String,
    /// Steps leading to the finding.
    #[serde(default)]
    pub path: Vec<PathPiece>,
}

/// A parsed translation unit as seen by an analyzer.
#[derive(Clone, Copy)]
pub struct AnalysisUnit<'u, 'a> {
    /// Path of the unit.
    pub file: &'u Path,
    /// Source text.
    pub source: &'u str,
    /// Root of the outline tree.
    pub root: &'u SyntaxNode<'a>,
    /// Line index of the source.
    pub line_index: &'u LineIndex,
}

/// A subsystem producing path diagnostics.
pub trait DiagnosticProducer: Send + Sync {
    /// Returns the producer's name.
    fn name(&self) -> &str;

    /// Returns every checker the producer knows, without prefix.
    fn checkers(&self) -> Vec<String>;

    /// Analyses one unit with the checkers in `enabled`.
    fn produce(
        &self,
        unit: &AnalysisUnit<'_, '_>,
        enabled: &[String],
    ) -> Result<Vec<PathDiagnostic>, LintelError>;
}

/// Returns true for debug-only checkers.
pub fn is_debug_checker(checker: &str) -> bool {
    checker.starts_with("debug.") || checker == "debug"
}

/// Returns true for the foundational checkers every path-sensitive checker
/// depends on.
pub fn is_core_checker(checker: &str) -> bool {
    checker == "core" || checker.starts_with("core.")
}

/// Returns the prefixed filter name of `checker`.
pub fn prefixed(checker: &str) -> String {
    format!("{ANALYZER_PREFIX}{checker}")
}

/// Computes which checkers run, in the producer's order.
///
/// A non-debug checker runs when the filter enables its prefixed name. When
/// at least one does, every core checker runs too. Debug checkers run only
/// when the filter names them literally.
pub fn control_list(filter: &ChecksFilter, checkers: &[String]) -> Vec<String> {
    let any_enabled = checkers
        .iter()
        .any(|c| !is_debug_checker(c) && filter.is_enabled(&prefixed(c)));

    checkers
        .iter()
        .filter(|c| {
            if is_debug_checker(c) {
                filter.is_explicitly_enabled(&prefixed(c))
            } else {
                filter.is_enabled(&prefixed(c)) || (any_enabled && is_core_checker(c))
            }
        })
        .cloned()
        .collect()
}

/// Converts a finding into a diagnostic.
pub fn to_diagnostic(file: &Path, finding: PathDiagnostic) -> Diagnostic {
    let check_name = prefixed(&finding.checker);
    let mut diagnostic = Diagnostic::new(
        check_name,
        SourceLocation::new(file, finding.offset),
        finding.message,
    )
    .with_severity(Severity::Warning);
    for step in finding.path {
        diagnostic = diagnostic.with_note(SourceLocation::new(file, step.offset), step.message);
    }
    diagnostic
}
