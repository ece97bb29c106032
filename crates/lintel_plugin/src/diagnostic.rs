//! Diagnostic types emitted by checks.

use std::fmt;
use std::path::{Path, PathBuf};

use lintel_ast::Span;
use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - fails the run.
    Error,
    /// Warning - should be reviewed.
    #[default]
    Warning,
    /// Remark - informational finding.
    Remark,
    /// Note - attached explanation of another diagnostic.
    Note,
    /// Ignored - suppressed, never displayed.
    Ignored,
}

impl Severity {
    /// Returns the lowercase name used in rendered output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Remark => "remark",
            Severity::Note => "note",
            Severity::Ignored => "ignored",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file and byte offset.
///
/// An empty `file` marks a synthetic diagnostic with no location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path of the file.
    pub file: PathBuf,
    /// Byte offset into the file.
    pub offset: u32,
}

impl SourceLocation {
    /// Creates a new location.
    pub fn new(file: impl Into<PathBuf>, offset: u32) -> Self {
        Self {
            file: file.into(),
            offset,
        }
    }

    /// Creates a location that points nowhere.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if the location names a file.
    pub fn has_file(&self) -> bool {
        !self.file.as_os_str().is_empty()
    }
}

/// A proposed textual replacement.
///
/// Replaces `length` bytes at `offset` in `file` with `replacement_text`.
/// Insertions have a zero length, removals an empty replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edit {
    /// Target file.
    pub file: PathBuf,
    /// Byte offset of the replaced range.
    pub offset: u32,
    /// Length of the replaced range in bytes.
    pub length: u32,
    /// Text that replaces the range.
    pub replacement_text: String,
}

impl Edit {
    /// Creates an edit replacing `span` with `text`.
    pub fn replacement(file: impl Into<PathBuf>, span: Span, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            offset: span.start,
            length: span.len(),
            replacement_text: text.into(),
        }
    }

    /// Creates an edit inserting `text` at `offset`.
    pub fn insertion(file: impl Into<PathBuf>, offset: u32, text: impl Into<String>) -> Self {
        Self::replacement(file, Span::empty(offset), text)
    }

    /// Creates an edit removing `span`.
    pub fn removal(file: impl Into<PathBuf>, span: Span) -> Self {
        Self::replacement(file, span, String::new())
    }

    /// Returns the replaced range in original-file offsets.
    ///
    /// Saturates instead of overflowing for hand-written edits.
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset.saturating_add(self.length))
    }

    /// Returns the location the edit starts at.
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.file.clone(), self.offset)
    }

    /// Returns true if the edit targets `path`.
    pub fn targets(&self, path: &Path) -> bool {
        self.file == path
    }
}

/// A check-attributed finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the check that produced the diagnostic.
    pub check_name: String,

    /// Human-readable message.
    pub message: String,

    /// Where the finding is.
    pub location: SourceLocation,

    /// Requested severity, resolved by the diagnostic context.
    #[serde(default)]
    pub severity: Severity,

    /// Suggested edits, in the order the check attached them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<Edit>,

    /// Attached notes. Notes always carry [`Severity::Note`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Creates a new diagnostic with the default severity.
    pub fn new(
        check_name: impl Into<String>,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check_name: check_name.into(),
            message: message.into(),
            location,
            severity: Severity::default(),
            edits: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Creates a note. Notes are attributed to the same check as their parent.
    pub fn note(
        check_name: impl Into<String>,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(check_name, location, message).with_severity(Severity::Note)
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Appends an edit.
    pub fn with_edit(mut self, edit: Edit) -> Self {
        self.edits.push(edit);
        self
    }

    /// Appends a note at `location`.
    pub fn with_note(mut self, location: SourceLocation, message: impl Into<String>) -> Self {
        let note = Diagnostic::note(self.check_name.clone(), location, message);
        self.notes.push(note);
        self
    }

    /// Returns true if the diagnostic offers at least one edit.
    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }
}
