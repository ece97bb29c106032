//! Original text of every file a run touches.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::LintelError;

/// Caches file contents as first read from disk.
///
/// Edits are expressed against the original text, so both fix application
/// and rendering read from here rather than from the (possibly rewritten)
/// file.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: RwLock<HashMap<PathBuf, Arc<str>>>,
}

impl SourceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the original text of `path`, reading it on first use.
    pub fn load(&self, path: &Path) -> Result<Arc<str>, LintelError> {
        if let Some(text) = self.get(path) {
            return Ok(text);
        }

        let text: Arc<str> = fs::read_to_string(path)
            .map_err(|e| LintelError::file(format!("Failed to read {}: {}", path.display(), e)))?
            .into();
        let mut files = self.files.write();
        Ok(Arc::clone(
            files.entry(path.to_path_buf()).or_insert(text),
        ))
    }

    /// Returns the cached text of `path`.
    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.files.read().get(path).cloned()
    }

    /// Seeds the text of `path` without touching the disk.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<Arc<str>>) {
        self.files.write().insert(path.into(), text.into());
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

/// Drops `.` components, so `./a.cc` and `a.cc` are spelled alike.
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Returns the key under which two spellings of one file compare equal.
///
/// Falls back to the normalized spelling when the file cannot be resolved.
pub fn file_identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| normalize_path(path))
}
