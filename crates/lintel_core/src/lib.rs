//! # lintel_core
//!
//! Check dispatch, diagnostic aggregation and fix application for lintel.
//!
//! This crate provides:
//! - The [`Linter`] orchestrator
//! - Configuration loading and the check filter
//! - The run-wide [`DiagnosticContext`]
//! - Conflict-aware fix application and rendering
//! - Export and merging of replacement documents
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintel_core::{CheckRegistry, Linter, LintelConfig};
//!
//! let registry = CheckRegistry::new(lintel_checks::builtin_factories()?);
//! let linter = Linter::new(LintelConfig::new(), registry)?;
//!
//! let files = linter.discover_files(&["src".into()]);
//! let mut run = linter.lint_files(&files)?;
//! let outcome = linter.apply_fixes(&mut run, false);
//! println!("{} diagnostics, {} fixes offered", run.diagnostics.len(), outcome.offered);
//! ```

pub mod analyzer;
mod config;
mod context;
pub mod dispatcher;
mod error;
mod filter;
pub mod fixer;
mod linter;
mod registry;
pub mod replacements;
mod reporter;
mod source_map;
pub mod suppression;

pub use analyzer::{AnalysisUnit, DiagnosticProducer, PathDiagnostic, PathPiece};
pub use config::LintelConfig;
pub use context::{DiagnosticContext, RunStatistics};
pub use dispatcher::{CheckDispatcher, INTERNAL_ERROR_CHECK};
pub use error::LintelError;
pub use filter::ChecksFilter;
pub use fixer::{FailureReason, FixApplier, FixAttempt, FixOutcome, FixStatus};
pub use linter::{LintRun, Linter};
pub use registry::CheckRegistry;
pub use replacements::{
    ReplacementConflict, ReplacementReport, TranslationUnitReplacements, apply_replacements,
    export_fixes,
};
pub use reporter::ErrorReporter;
pub use source_map::SourceMap;
