//! Run configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use lintel_plugin::Severity;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LintelError;

/// Configuration for a lint run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintelConfig {
    /// Check filter patterns, applied in order (last match wins).
    ///
    /// Each entry may itself be a comma-separated list such as `"-*,llvm-*"`.
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,

    /// Turns every warning into an error.
    #[serde(default)]
    pub warnings_as_errors: bool,

    /// Counts the edits of suppressed diagnostics as offered fixes.
    #[serde(default)]
    pub count_ignored_fixes: bool,

    /// Severity overrides keyed by check-name glob.
    #[serde(default)]
    pub severities: BTreeMap<String, Severity>,

    /// Options passed to individual checks.
    #[serde(default)]
    pub check_options: BTreeMap<String, serde_json::Value>,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_checks() -> Vec<String> {
    vec!["llvm-*".to_string()]
}

impl LintelConfig {
    /// File names searched for, in order of preference.
    pub const CONFIG_FILES: &'static [&'static str] = &[".lintel.jsonc", ".lintel.json"];

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            checks: default_checks(),
            warnings_as_errors: false,
            count_ignored_fixes: false,
            severities: BTreeMap::new(),
            check_options: BTreeMap::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LintelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LintelError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parses configuration from JSON. Comments and trailing commas are allowed.
    pub fn from_json(json: &str) -> Result<Self, LintelError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LintelError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| LintelError::config(format!("Invalid config: {}", e)))
    }

    /// Searches `start` and its ancestors for a configuration file.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            Self::CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Loads `explicit` if given, otherwise the first file discovered from
    /// `cwd`, otherwise the defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, LintelError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::discover(cwd) {
                Some(path) => {
                    debug!("Using configuration {}", path.display());
                    Self::from_file(path)
                }
                None => {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::new())
                }
            },
        }
    }

    /// Appends filter patterns after the configured ones.
    pub fn push_checks(&mut self, patterns: impl IntoIterator<Item = String>) {
        self.checks.extend(patterns);
    }
}

impl Default for LintelConfig {
    fn default() -> Self {
        Self::new()
    }
}
