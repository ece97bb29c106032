//! # lintel_plugin
//!
//! The contract between the lintel engine and its checks.
//!
//! This crate provides:
//! - Diagnostic types (`Diagnostic`, `Edit`, `Severity`, `SourceLocation`)
//! - The `DiagnosticEmitter` sink and the `DiagnosticBuilder` checks report through
//! - The `Check` capability and the `CheckContext` it runs with
//! - Tree queries (`Query`, `MatchFinder`, `MatchResult`)
//! - Factory bindings (`CheckFactories`, `CheckModule`)
//!
//! ## Example
//!
//! ```rust
//! use lintel_ast::NodeKind;
//! use lintel_plugin::{
//!     Check, CheckContext, CheckFactories, MatchFinder, MatchResult, PluginError, Query,
//! };
//!
//! #[derive(Default)]
//! struct NoNamespaces;
//!
//! impl Check for NoNamespaces {
//!     fn register_queries(&self, finder: &mut MatchFinder) {
//!         finder.add_matcher(Query::node(NodeKind::Namespace));
//!     }
//!
//!     fn check(
//!         &self,
//!         result: &MatchResult<'_, '_>,
//!         ctx: &CheckContext<'_>,
//!     ) -> Result<(), PluginError> {
//!         ctx.report(result.node.span.start, "namespaces are not allowed here");
//!         Ok(())
//!     }
//! }
//!
//! let mut factories = CheckFactories::new();
//! factories.register_default::<NoNamespaces>("demo-no-namespaces")?;
//! # Ok::<(), PluginError>(())
//! ```

mod check;
mod diagnostic;
mod emitter;
mod error;
mod factories;
mod matcher;

pub use check::{Check, CheckContext, CheckOptions};
pub use diagnostic::{Diagnostic, Edit, Severity, SourceLocation};
pub use emitter::{DiagnosticBuilder, DiagnosticEmitter};
pub use error::PluginError;
pub use factories::{CheckFactories, CheckFactory, CheckModule};
pub use matcher::{MatchFinder, MatchResult, Query};
