//! Run-wide diagnostic sink.

use std::collections::{BTreeMap, HashSet};

use globset::{Glob, GlobMatcher};
use lintel_plugin::{Diagnostic, DiagnosticBuilder, DiagnosticEmitter, Severity, SourceLocation};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{LintelConfig, LintelError};

/// Counters updated while a run progresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Diagnostics whose resolved severity was `Ignored`.
    pub errors_ignored: usize,
    /// Diagnostics kept for display.
    pub errors_displayed: usize,
    /// Edits offered by displayed diagnostics (and by ignored ones when
    /// `count_ignored_fixes` is set).
    pub total_fixes_offered: usize,
    /// Edits written back to disk, filled in by `Linter::apply_fixes`.
    pub fixes_applied: usize,
    /// Diagnostics dropped because an identical one was already kept.
    pub errors_deduplicated: usize,
}

#[derive(Debug, Clone)]
struct SeverityOverride {
    pattern: String,
    literal: bool,
    matcher: GlobMatcher,
    severity: Severity,
}

#[derive(Debug, Default)]
struct State {
    errors: Vec<Diagnostic>,
    seen: HashSet<Diagnostic>,
    stats: RunStatistics,
}

/// Receives every diagnostic of a run.
///
/// Resolves severities, drops ignored and duplicate diagnostics, and keeps
/// the rest in emission order together with the run statistics. Shared by
/// all units; mutation happens under a single lock.
#[derive(Debug)]
pub struct DiagnosticContext {
    warnings_as_errors: bool,
    count_ignored_fixes: bool,
    overrides: Vec<SeverityOverride>,
    check_options: BTreeMap<String, Value>,
    state: Mutex<State>,
}

impl DiagnosticContext {
    /// Creates a context from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid severity glob.
    pub fn new(config: &LintelConfig) -> Result<Self, LintelError> {
        let overrides = config
            .severities
            .iter()
            .map(|(pattern, severity)| {
                let glob = Glob::new(pattern).map_err(|e| {
                    LintelError::config(format!("Invalid severity pattern '{}': {}", pattern, e))
                })?;
                Ok(SeverityOverride {
                    pattern: pattern.clone(),
                    literal: !pattern.contains(['*', '?', '[', ']', '{', '}']),
                    matcher: glob.compile_matcher(),
                    severity: *severity,
                })
            })
            .collect::<Result<Vec<_>, LintelError>>()?;

        Ok(Self {
            warnings_as_errors: config.warnings_as_errors,
            count_ignored_fixes: config.count_ignored_fixes,
            overrides,
            check_options: config.check_options.clone(),
            state: Mutex::new(State::default()),
        })
    }

    /// Starts a diagnostic that is handed to this context when finished.
    pub fn report(
        &self,
        check_name: impl Into<String>,
        location: SourceLocation,
        message: impl Into<String>,
        severity: Severity,
    ) -> DiagnosticBuilder<'_> {
        let diagnostic = Diagnostic::new(check_name, location, message).with_severity(severity);
        DiagnosticBuilder::new(self, diagnostic)
    }

    /// Resolves the displayed severity of a diagnostic from `check_name`.
    ///
    /// `Ignored` and `Note` are kept as requested. Otherwise a severity
    /// override applies (a literal name beats globs, a longer glob beats a
    /// shorter one), then "warnings as errors".
    pub fn resolve_severity(&self, check_name: &str, requested: Severity) -> Severity {
        if matches!(requested, Severity::Ignored | Severity::Note) {
            return requested;
        }

        let resolved = self
            .overrides
            .iter()
            .filter(|o| o.matcher.is_match(check_name))
            .max_by_key(|o| (o.literal, o.pattern.len()))
            .map_or(requested, |o| o.severity);

        match resolved {
            Severity::Warning if self.warnings_as_errors => Severity::Error,
            other => other,
        }
    }

    /// Returns the kept diagnostics in emission order.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.state.lock().errors.clone()
    }

    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> RunStatistics {
        self.state.lock().stats
    }

    /// Consumes the context, returning diagnostics and statistics.
    pub fn into_parts(self) -> (Vec<Diagnostic>, RunStatistics) {
        let state = self.state.into_inner();
        (state.errors, state.stats)
    }
}

fn force_note_severity(notes: &mut [Diagnostic]) {
    for note in notes {
        note.severity = Severity::Note;
        force_note_severity(&mut note.notes);
    }
}

impl DiagnosticEmitter for DiagnosticContext {
    fn emit(&self, mut diagnostic: Diagnostic) {
        diagnostic.severity = self.resolve_severity(&diagnostic.check_name, diagnostic.severity);
        force_note_severity(&mut diagnostic.notes);

        let mut state = self.state.lock();
        if diagnostic.severity == Severity::Ignored {
            state.stats.errors_ignored += 1;
            if self.count_ignored_fixes {
                state.stats.total_fixes_offered += diagnostic.edits.len();
            }
            return;
        }

        if state.seen.contains(&diagnostic) {
            debug!(
                "Dropping duplicate diagnostic from '{}'",
                diagnostic.check_name
            );
            state.stats.errors_deduplicated += 1;
            return;
        }

        state.stats.errors_displayed += 1;
        state.stats.total_fixes_offered += diagnostic.edits.len();
        state.seen.insert(diagnostic.clone());
        state.errors.push(diagnostic);
    }

    fn check_options(&self, check_name: &str) -> Option<&Value> {
        self.check_options.get(check_name)
    }
}
