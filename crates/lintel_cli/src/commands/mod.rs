//! Subcommand implementations

pub mod apply_replacements;
pub mod check;
pub mod list_checks;

use std::path::Path;

use lintel_core::{CheckRegistry, LintelConfig};
use miette::{IntoDiagnostic, Result};

use crate::cli::Cli;

/// Builds the registry of built-in checks.
pub fn builtin_registry() -> Result<CheckRegistry> {
    let factories = lintel_checks::builtin_factories().into_diagnostic()?;
    Ok(CheckRegistry::new(factories))
}

/// Loads `--config` or the discovered configuration, then appends `checks`.
pub fn load_config(cli: &Cli, checks: Option<&str>) -> Result<LintelConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let mut config = LintelConfig::load(cli.config.as_deref(), &cwd).into_diagnostic()?;
    if let Some(checks) = checks {
        config.push_checks([checks.to_string()]);
    }
    Ok(config)
}

/// Returns `path` for display, relative to the working directory when
/// possible.
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
