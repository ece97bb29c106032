//! Conflict-aware application of suggested edits.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use lintel_ast::Span;
use lintel_plugin::{Diagnostic, Edit};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::SourceMap;
use crate::source_map::file_identity;

/// Why an edit was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The edit's range is outside the file or splits a character.
    OutOfRange,
    /// The edit's range overlaps an edit applied before it.
    Conflict,
    /// The file could not be read.
    Read(String),
    /// The file could not be written back.
    Write(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::OutOfRange => f.write_str("edit range is out of bounds"),
            FailureReason::Conflict => f.write_str("edit conflicts with an applied edit"),
            FailureReason::Read(e) => write!(f, "could not read file: {e}"),
            FailureReason::Write(e) => write!(f, "could not write file: {e}"),
        }
    }
}

/// What happened to one edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    /// The edit is in the written file.
    Applied,
    /// The edit was rejected.
    Failed(FailureReason),
}

/// One attempted edit and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixAttempt {
    /// The edit.
    pub edit: Edit,
    /// Its status.
    pub status: FixStatus,
}

/// Result of a fix pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixOutcome {
    /// Edits offered by the diagnostics.
    pub offered: usize,
    /// Edits written back.
    pub applied: usize,
    /// Every attempted edit, in encounter order. Empty for a dry run.
    pub attempts: Vec<FixAttempt>,
    /// Files rewritten.
    pub files_written: Vec<PathBuf>,
    /// Files that could not be read or written, with the reason.
    pub file_errors: Vec<(PathBuf, String)>,
}

impl FixOutcome {
    /// Returns the status of `edit`, if it was attempted.
    pub fn status_of(&self, edit: &Edit) -> Option<&FixStatus> {
        self.attempts
            .iter()
            .find(|attempt| &attempt.edit == edit)
            .map(|attempt| &attempt.status)
    }
}

/// Resolves `edits` against `text` and splices the accepted ones.
///
/// Edits are simultaneous replacements against the original text: each is
/// checked in order against the original offsets of the edits accepted
/// before it. An edit identical to an accepted one is treated as applied
/// without being spliced twice. Two insertions at the same point are both
/// accepted, in encounter order.
///
/// Returns the new text and, per edit, `None` when applied or the reason it
/// was rejected.
pub fn apply_edits(text: &str, edits: &[&Edit]) -> (String, Vec<Option<FailureReason>>) {
    let mut accepted: Vec<(usize, Span)> = Vec::new();
    let mut results = Vec::with_capacity(edits.len());

    for (index, edit) in edits.iter().enumerate() {
        let span = edit.span();
        let (start, end) = (span.start as usize, span.end as usize);
        if end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            debug!("Rejecting out-of-range edit at [{}, {})", start, end);
            results.push(Some(FailureReason::OutOfRange));
            continue;
        }

        if accepted.iter().any(|&(i, _)| edits[i] == *edit) {
            results.push(None);
            continue;
        }

        if accepted.iter().any(|(_, other)| other.intersects(&span)) {
            debug!("Rejecting conflicting edit at [{}, {})", start, end);
            results.push(Some(FailureReason::Conflict));
            continue;
        }

        accepted.push((index, span));
        results.push(None);
    }

    // Insertions go before a replacement starting at the same offset.
    accepted.sort_by_key(|&(index, span)| (span.start, !span.is_empty(), index));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (index, span) in accepted {
        out.push_str(&text[cursor..span.start as usize]);
        out.push_str(&edits[index].replacement_text);
        cursor = span.end as usize;
    }
    out.push_str(&text[cursor..]);

    (out, results)
}

/// Applies the edits of surfaced diagnostics to their files.
pub struct FixApplier<'s> {
    sources: &'s SourceMap,
}

impl<'s> FixApplier<'s> {
    /// Creates an applier reading original text from `sources`.
    pub fn new(sources: &'s SourceMap) -> Self {
        Self { sources }
    }

    /// Counts every edit as offered and, when `commit` is set, writes the
    /// non-conflicting ones back to disk.
    ///
    /// A file is rewritten only when at least one of its edits applied.
    pub fn apply(&self, diagnostics: &[Diagnostic], commit: bool) -> FixOutcome {
        let edits: Vec<&Edit> = diagnostics.iter().flat_map(|d| &d.edits).collect();
        let mut outcome = FixOutcome {
            offered: edits.len(),
            ..FixOutcome::default()
        };
        if !commit || edits.is_empty() {
            return outcome;
        }

        // Spellings of one file share a group; the first spelling is used for IO.
        let mut by_file: BTreeMap<PathBuf, (&Path, Vec<usize>)> = BTreeMap::new();
        for (index, edit) in edits.iter().enumerate() {
            by_file
                .entry(file_identity(&edit.file))
                .or_insert_with(|| (edit.file.as_path(), Vec::new()))
                .1
                .push(index);
        }

        let mut statuses: Vec<FixStatus> = vec![FixStatus::Applied; edits.len()];
        for (file, indices) in by_file.into_values() {
            let file_edits: Vec<&Edit> = indices.iter().map(|&i| edits[i]).collect();
            match self.apply_to_file(file, &file_edits) {
                Ok(results) => {
                    let applied = results.iter().filter(|r| r.is_none()).count();
                    for (&index, result) in indices.iter().zip(results) {
                        if let Some(reason) = result {
                            statuses[index] = FixStatus::Failed(reason);
                        }
                    }
                    if applied > 0 {
                        outcome.files_written.push(file.to_path_buf());
                    }
                }
                Err(reason) => {
                    warn!("Could not fix {}: {}", file.display(), reason);
                    outcome
                        .file_errors
                        .push((file.to_path_buf(), reason.to_string()));
                    for &index in &indices {
                        statuses[index] = FixStatus::Failed(reason.clone());
                    }
                }
            }
        }

        outcome.attempts = edits
            .into_iter()
            .zip(statuses)
            .map(|(edit, status)| FixAttempt {
                edit: edit.clone(),
                status,
            })
            .collect();
        outcome.applied = outcome
            .attempts
            .iter()
            .filter(|a| a.status == FixStatus::Applied)
            .count();
        info!(
            "Applied {} of {} suggested fixes",
            outcome.applied, outcome.offered
        );
        outcome
    }

    fn apply_to_file(
        &self,
        file: &Path,
        edits: &[&Edit],
    ) -> Result<Vec<Option<FailureReason>>, FailureReason> {
        let text = self
            .sources
            .load(file)
            .map_err(|e| FailureReason::Read(e.to_string()))?;
        let (fixed, results) = apply_edits(&text, edits);

        if results.iter().any(Option::is_none) {
            fs::write(file, fixed).map_err(|e| FailureReason::Write(e.to_string()))?;
            debug!("Wrote {}", file.display());
        }
        Ok(results)
    }
}
