//! Diagnostic sink and the builder checks report through.

use serde_json::Value;

use crate::{Diagnostic, Edit, SourceLocation};

/// A sink that accepts finished diagnostics.
///
/// Implementations must be safe to share between threads: every unit of a
/// run reports into the same sink.
pub trait DiagnosticEmitter: Send + Sync {
    /// Accepts a finished diagnostic.
    fn emit(&self, diagnostic: Diagnostic);

    /// Returns the configured options of a check, if any.
    fn check_options(&self, check_name: &str) -> Option<&Value> {
        let _ = check_name;
        None
    }
}

/// A diagnostic under construction.
///
/// Returned by `report(...)`. Edits and notes are attached fluently and the
/// diagnostic is handed to the emitter when the builder is dropped, or
/// earlier through [`DiagnosticBuilder::emit`].
///
/// ```rust
/// use lintel_plugin::{Diagnostic, DiagnosticBuilder, DiagnosticEmitter, Edit, SourceLocation};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Collect(Mutex<Vec<Diagnostic>>);
///
/// impl DiagnosticEmitter for Collect {
///     fn emit(&self, diagnostic: Diagnostic) {
///         self.0.lock().unwrap().push(diagnostic);
///     }
/// }
///
/// let sink = Collect::default();
/// let location = SourceLocation::new("a.cc", 4);
/// DiagnosticBuilder::new(&sink, Diagnostic::new("demo", location, "message"))
///     .with_edit(Edit::insertion("a.cc", 4, "x"));
///
/// assert_eq!(sink.0.lock().unwrap()[0].edits.len(), 1);
/// ```
pub struct DiagnosticBuilder<'e> {
    emitter: &'e dyn DiagnosticEmitter,
    diagnostic: Option<Diagnostic>,
}

impl<'e> DiagnosticBuilder<'e> {
    /// Starts building `diagnostic` for `emitter`.
    pub fn new(emitter: &'e dyn DiagnosticEmitter, diagnostic: Diagnostic) -> Self {
        Self {
            emitter,
            diagnostic: Some(diagnostic),
        }
    }

    /// Attaches a suggested edit.
    pub fn with_edit(mut self, edit: Edit) -> Self {
        if let Some(diagnostic) = self.diagnostic.as_mut() {
            diagnostic.edits.push(edit);
        }
        self
    }

    /// Attaches several edits at once.
    pub fn with_edits(mut self, edits: impl IntoIterator<Item = Edit>) -> Self {
        if let Some(diagnostic) = self.diagnostic.as_mut() {
            diagnostic.edits.extend(edits);
        }
        self
    }

    /// Attaches a note at `location`.
    pub fn with_note(mut self, location: SourceLocation, message: impl Into<String>) -> Self {
        if let Some(diagnostic) = self.diagnostic.take() {
            self.diagnostic = Some(diagnostic.with_note(location, message));
        }
        self
    }

    /// Emits the diagnostic now.
    pub fn emit(mut self) {
        self.flush();
    }

    /// Drops the diagnostic without emitting it.
    pub fn cancel(mut self) -> Option<Diagnostic> {
        self.diagnostic.take()
    }

    fn flush(&mut self) {
        if let Some(diagnostic) = self.diagnostic.take() {
            self.emitter.emit(diagnostic);
        }
    }
}

impl Drop for DiagnosticBuilder<'_> {
    fn drop(&mut self) {
        // A half-built diagnostic from a panicking check is discarded.
        if !std::thread::panicking() {
            self.flush();
        }
    }
}
