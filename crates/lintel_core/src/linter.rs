//! Run orchestration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use lintel_ast::{AstArena, LineIndex};
use lintel_parser::{CxxParser, Parser};
use lintel_plugin::{Diagnostic, Severity};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::dispatcher::{CheckDispatcher, Unit};
use crate::fixer::{FixApplier, FixOutcome};
use crate::source_map::{file_identity, normalize_path};
use crate::suppression::SuppressingEmitter;
use crate::{
    CheckRegistry, ChecksFilter, DiagnosticContext, LintelConfig, LintelError, RunStatistics,
    SourceMap,
};

/// Everything a run produced.
#[derive(Debug, Default, Serialize)]
pub struct LintRun {
    /// Surfaced diagnostics, sorted by location.
    pub diagnostics: Vec<Diagnostic>,
    /// Run statistics.
    pub stats: RunStatistics,
    /// Units that could not be processed, sorted by path.
    #[serde(serialize_with = "serialize_failures")]
    pub failures: Vec<(PathBuf, LintelError)>,
}

impl LintRun {
    /// Returns true if an error was displayed or a unit failed.
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
            || self
                .diagnostics
                .iter()
                .any(|d| d.severity == Severity::Error)
    }
}

fn serialize_failures<S: serde::Serializer>(
    failures: &[(PathBuf, LintelError)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(failures.iter().map(|(path, error)| {
        serde_json::json!({
            "path": path.display().to_string(),
            "error": error.to_string(),
        })
    }))
}

/// The lint engine.
///
/// Owns the configuration, the injected registry and the original text of
/// every file it reads.
pub struct Linter {
    config: LintelConfig,
    registry: CheckRegistry,
    filter: ChecksFilter,
    parsers: Vec<Box<dyn Parser>>,
    sources: SourceMap,
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
}

impl Linter {
    /// Creates a linter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid check or file patterns.
    pub fn new(config: LintelConfig, registry: CheckRegistry) -> Result<Self, LintelError> {
        let filter = ChecksFilter::new(&config.checks)?;
        let include_globs = build_globset(&config.include)?;
        let exclude_globs = build_globset(&config.exclude)?;

        Ok(Self {
            config,
            registry,
            filter,
            parsers: vec![Box::new(CxxParser::new())],
            sources: SourceMap::new(),
            include_globs,
            exclude_globs,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LintelConfig {
        &self.config
    }

    /// Returns the check filter.
    pub fn filter(&self) -> &ChecksFilter {
        &self.filter
    }

    /// Returns the original text of every file read so far.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Returns the sorted names of every check and analyzer checker that
    /// would run.
    pub fn check_names(&self) -> Vec<String> {
        self.registry.check_names(&self.filter)
    }

    /// Expands `paths` into the units to lint.
    ///
    /// Files are taken as given. Directories are walked for files a parser
    /// accepts. Include and exclude patterns apply to both. A file reached
    /// through several spellings is kept once.
    pub fn discover_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                    let candidate = entry.path();
                    if entry.file_type().is_file()
                        && self.parser_for(candidate).is_some()
                        && !self.should_ignore(candidate)
                    {
                        files.push(normalize_path(candidate));
                    }
                }
            } else if !self.should_ignore(path) {
                files.push(normalize_path(path));
            }
        }

        files.sort();
        let mut seen = HashSet::new();
        files.retain(|file| seen.insert(file_identity(file)));

        info!("Discovered {} files to lint", files.len());
        files
    }

    /// Lints `files` in parallel.
    ///
    /// # Errors
    ///
    /// Fails before any unit is processed when the configuration is
    /// unusable. Failures of single units are collected in the result.
    pub fn lint_files(&self, files: &[PathBuf]) -> Result<LintRun, LintelError> {
        let context = DiagnosticContext::new(&self.config)?;
        let dispatcher = CheckDispatcher::new(&self.registry, &self.filter);

        // Instantiate once up front so option errors abort the run.
        let startup_checks = dispatcher.create_active_checks(&context)?;
        debug!("{} checks enabled", startup_checks.len());
        drop(startup_checks);

        let mut failures: Vec<(PathBuf, LintelError)> = files
            .par_iter()
            .filter_map(|path| {
                self.lint_unit(path, &dispatcher, &context)
                    .err()
                    .map(|e| (path.clone(), e))
            })
            .collect();
        failures.sort_by(|a, b| a.0.cmp(&b.0));

        let (mut diagnostics, stats) = context.into_parts();
        diagnostics.sort_by(|a, b| a.location.cmp(&b.location));

        info!(
            "Linted {} files: {} diagnostics, {} failures",
            files.len(),
            diagnostics.len(),
            failures.len()
        );
        Ok(LintRun {
            diagnostics,
            stats,
            failures,
        })
    }

    /// Counts the offered edits of `run` and, when `commit` is set, writes
    /// them back. Updates `run.stats.fixes_applied`.
    pub fn apply_fixes(&self, run: &mut LintRun, commit: bool) -> FixOutcome {
        let outcome = FixApplier::new(&self.sources).apply(&run.diagnostics, commit);
        run.stats.fixes_applied += outcome.applied;
        outcome
    }

    fn lint_unit(
        &self,
        path: &Path,
        dispatcher: &CheckDispatcher<'_>,
        context: &DiagnosticContext,
    ) -> Result<(), LintelError> {
        let parser = self.parser_for(path).ok_or_else(|| {
            LintelError::file(format!("No parser accepts {}", path.display()))
        })?;
        let source = self.sources.load(path)?;

        let arena = AstArena::with_capacity(source.len() / 4);
        let root = parser.parse(&arena, &source)?;
        let line_index = LineIndex::new(&source);

        let checks = dispatcher.create_active_checks(context)?;
        let emitter = SuppressingEmitter::new(context, path, &source, &line_index);
        let unit = Unit {
            file: path,
            source: &source,
            root: &root,
            line_index: &line_index,
        };
        dispatcher.run(&unit, &checks, &emitter);

        debug!("Finished {} with {} checks", path.display(), checks.len());
        Ok(())
    }

    fn parser_for(&self, path: &Path) -> Option<&dyn Parser> {
        let extension = path.extension()?.to_str()?;
        self.parsers
            .iter()
            .find(|parser| parser.can_parse(extension))
            .map(|parser| parser.as_ref())
    }

    fn should_ignore(&self, path: &Path) -> bool {
        let relative = self
            .config
            .base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);

        if self
            .exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(path) || excludes.is_match(relative))
        {
            return true;
        }

        self.include_globs
            .as_ref()
            .is_some_and(|includes| !includes.is_match(path) && !includes.is_match(relative))
    }
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LintelError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            LintelError::config(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }

    let globset = builder
        .build()
        .map_err(|e| LintelError::config(format!("Failed to build globset: {}", e)))?;

    Ok(Some(globset))
}
