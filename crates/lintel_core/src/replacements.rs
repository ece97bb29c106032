//! Exported replacement documents and merging them back into files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lintel_plugin::{Diagnostic, Edit};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::LintelError;
use crate::fixer::apply_edits;
use crate::source_map::file_identity;

/// A set of edits written by `--export-fixes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnitReplacements {
    /// Main file of the run. Empty when the document covers many units.
    #[serde(default)]
    pub main_source_file: PathBuf,
    /// Edits in diagnostic order.
    #[serde(default)]
    pub replacements: Vec<Edit>,
}

impl TranslationUnitReplacements {
    /// Collects the edits of `diagnostics`.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        Self {
            main_source_file: PathBuf::new(),
            replacements: diagnostics
                .iter()
                .flat_map(|d| d.edits.iter().cloned())
                .collect(),
        }
    }
}

/// Writes the edits of `diagnostics` to `path` as one JSON document.
pub fn export_fixes(path: &Path, diagnostics: &[Diagnostic]) -> Result<(), LintelError> {
    let document = TranslationUnitReplacements::from_diagnostics(diagnostics);
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(path, json).map_err(|e| {
        LintelError::file(format!("Failed to write {}: {}", path.display(), e))
    })?;
    info!(
        "Exported {} replacements to {}",
        document.replacements.len(),
        path.display()
    );
    Ok(())
}

/// Two replacements for the same file that overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementConflict {
    /// The file left untouched.
    pub file: PathBuf,
    /// The earlier replacement.
    pub first: Edit,
    /// The replacement overlapping it.
    pub second: Edit,
}

/// Result of merging a directory of replacement documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplacementReport {
    /// Documents read.
    pub documents: Vec<PathBuf>,
    /// Files rewritten.
    pub applied_files: Vec<PathBuf>,
    /// Files skipped because their replacements overlap.
    pub conflicts: Vec<ReplacementConflict>,
    /// Documents or files that could not be read or written.
    pub errors: Vec<(PathBuf, String)>,
}

impl ReplacementReport {
    /// Returns true if every file was handled.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.errors.is_empty()
    }
}

/// Applies every `*.json` replacement document under `dir`.
///
/// Replacements are grouped per file and exact duplicates removed. A file
/// whose remaining replacements overlap is reported and left untouched;
/// other files still proceed. With `remove_documents`, documents that were
/// read are deleted afterwards.
///
/// # Errors
///
/// Returns an error only if `dir` is not a directory.
pub fn apply_replacements(
    dir: &Path,
    remove_documents: bool,
) -> Result<ReplacementReport, LintelError> {
    if !dir.is_dir() {
        return Err(LintelError::file(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut report = ReplacementReport::default();
    let mut by_file: BTreeMap<PathBuf, (PathBuf, Vec<Edit>)> = BTreeMap::new();

    for path in find_documents(dir) {
        match read_document(&path) {
            Ok(document) => {
                debug!(
                    "Read {} replacements from {}",
                    document.replacements.len(),
                    path.display()
                );
                for edit in document.replacements {
                    let (_, edits) = by_file
                        .entry(file_identity(&edit.file))
                        .or_insert_with(|| (edit.file.clone(), Vec::new()));
                    if !edits.iter().any(|e| same_change(e, &edit)) {
                        edits.push(edit);
                    }
                }
                report.documents.push(path);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.errors.push((path, e.to_string()));
            }
        }
    }

    for (file, edits) in by_file.into_values() {
        if let Some(conflict) = find_conflict(&file, &edits) {
            warn!("Conflicting replacements in {}", file.display());
            report.conflicts.push(conflict);
            continue;
        }

        match apply_to_file(&file, &edits) {
            Ok(()) => report.applied_files.push(file),
            Err(e) => {
                warn!("Could not apply replacements to {}: {}", file.display(), e);
                report.errors.push((file, e.to_string()));
            }
        }
    }

    if remove_documents {
        for path in &report.documents {
            if let Err(e) = fs::remove_file(path) {
                report.errors.push((path.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Applied replacements to {} files ({} conflicts)",
        report.applied_files.len(),
        report.conflicts.len()
    );
    Ok(report)
}

fn same_change(a: &Edit, b: &Edit) -> bool {
    a.offset == b.offset && a.length == b.length && a.replacement_text == b.replacement_text
}

fn find_documents(dir: &Path) -> Vec<PathBuf> {
    let mut documents: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    documents.sort();
    documents
}

fn read_document(path: &Path) -> Result<TranslationUnitReplacements, LintelError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn find_conflict(file: &Path, edits: &[Edit]) -> Option<ReplacementConflict> {
    edits.iter().enumerate().find_map(|(i, first)| {
        edits[i + 1..]
            .iter()
            .find(|second| first.span().intersects(&second.span()))
            .map(|second| ReplacementConflict {
                file: file.to_path_buf(),
                first: first.clone(),
                second: second.clone(),
            })
    })
}

fn apply_to_file(file: &Path, edits: &[Edit]) -> Result<(), LintelError> {
    let text = fs::read_to_string(file)?;
    let refs: Vec<&Edit> = edits.iter().collect();
    let (fixed, results) = apply_edits(&text, &refs);
    if let Some(reason) = results.into_iter().flatten().next() {
        return Err(LintelError::file(format!(
            "{}: {}",
            file.display(),
            reason
        )));
    }
    fs::write(file, fixed)?;
    Ok(())
}
