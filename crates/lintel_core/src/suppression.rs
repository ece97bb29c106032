//! `NOLINT` comment suppression.

use std::path::Path;

use globset::Glob;
use lintel_ast::LineIndex;
use lintel_plugin::{Diagnostic, DiagnosticEmitter, Severity};
use serde_json::Value;

/// Wraps the run-wide emitter for one unit and marks diagnostics on
/// `NOLINT` lines as ignored before passing them on.
pub struct SuppressingEmitter<'u> {
    inner: &'u dyn DiagnosticEmitter,
    file: &'u Path,
    source: &'u str,
    line_index: &'u LineIndex,
}

impl<'u> SuppressingEmitter<'u> {
    /// Creates the emitter for one unit.
    pub fn new(
        inner: &'u dyn DiagnosticEmitter,
        file: &'u Path,
        source: &'u str,
        line_index: &'u LineIndex,
    ) -> Self {
        Self {
            inner,
            file,
            source,
            line_index,
        }
    }

    /// Returns true if a `NOLINT` comment covers `offset` for `check_name`.
    pub fn is_suppressed(&self, check_name: &str, offset: u32) -> bool {
        let line = self.line_index.line(offset);
        let same_line = self
            .line_index
            .line_text(line, self.source)
            .is_some_and(|text| marker_applies(text, "NOLINT", check_name));
        let previous_line = line > 1
            && self
                .line_index
                .line_text(line - 1, self.source)
                .is_some_and(|text| marker_applies(text, "NOLINTNEXTLINE", check_name));
        same_line || previous_line
    }
}

impl DiagnosticEmitter for SuppressingEmitter<'_> {
    fn emit(&self, mut diagnostic: Diagnostic) {
        if diagnostic.location.file == self.file
            && self.is_suppressed(&diagnostic.check_name, diagnostic.location.offset)
        {
            diagnostic.severity = Severity::Ignored;
        }
        self.inner.emit(diagnostic);
    }

    fn check_options(&self, check_name: &str) -> Option<&Value> {
        self.inner.check_options(check_name)
    }
}

/// Returns true if `line` carries `marker`, bare or with a check list that
/// matches `check_name`.
fn marker_applies(line: &str, marker: &str, check_name: &str) -> bool {
    let mut rest = line;
    while let Some(index) = rest.find(marker) {
        let after = &rest[index + marker.len()..];
        rest = after;

        // `NOLINT` must not match the start of `NOLINTNEXTLINE`.
        if marker == "NOLINT" && after.starts_with("NEXTLINE") {
            continue;
        }

        let Some(list) = after.strip_prefix('(') else {
            return true;
        };
        let Some(end) = list.find(')') else {
            return true;
        };
        if list[..end]
            .split(',')
            .map(str::trim)
            .any(|pattern| pattern_matches(pattern, check_name))
        {
            return true;
        }
    }
    false
}

fn pattern_matches(pattern: &str, check_name: &str) -> bool {
    match Glob::new(pattern) {
        Ok(glob) => glob.compile_matcher().is_match(check_name),
        Err(_) => pattern == check_name,
    }
}
