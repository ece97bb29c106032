//! Check instantiation and match routing.

use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lintel_ast::visitor::walk_node;
use lintel_ast::{LineIndex, SyntaxNode, VisitResult, Visitor};
use lintel_plugin::{
    Check, CheckContext, CheckOptions, Diagnostic, DiagnosticEmitter, MatchFinder, MatchResult,
    Severity, SourceLocation,
};
use tracing::{debug, warn};

use crate::analyzer::{self, AnalysisUnit};
use crate::{CheckRegistry, ChecksFilter, LintelError};

/// Check name of diagnostics reporting a failing check.
pub const INTERNAL_ERROR_CHECK: &str = "lintel-internal-error";

/// A check instantiated for one unit, with the queries it registered.
pub struct ActiveCheck {
    name: String,
    check: Box<dyn Check>,
    finder: MatchFinder,
}

impl ActiveCheck {
    /// Returns the name the check runs under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the queries the check registered.
    pub fn finder(&self) -> &MatchFinder {
        &self.finder
    }
}

/// One parsed translation unit.
#[derive(Clone, Copy)]
pub struct Unit<'u, 'a> {
    /// Path of the unit.
    pub file: &'u Path,
    /// Source text.
    pub source: &'u str,
    /// Root of the outline tree.
    pub root: &'u SyntaxNode<'a>,
    /// Line index of the source.
    pub line_index: &'u LineIndex,
}

/// Instantiates active checks and routes tree matches to them.
pub struct CheckDispatcher<'r> {
    registry: &'r CheckRegistry,
    filter: &'r ChecksFilter,
}

impl<'r> CheckDispatcher<'r> {
    /// Creates a dispatcher over `registry` restricted by `filter`.
    pub fn new(registry: &'r CheckRegistry, filter: &'r ChecksFilter) -> Self {
        Self { registry, filter }
    }

    /// Instantiates every enabled check, in registration order.
    ///
    /// Options come from `context`; a factory rejecting its options is an
    /// error. A check that panics while it is built or registers its
    /// queries is left out and reported to `context` as a
    /// [`INTERNAL_ERROR_CHECK`] diagnostic.
    pub fn create_active_checks(
        &self,
        context: &dyn DiagnosticEmitter,
    ) -> Result<Vec<ActiveCheck>, LintelError> {
        let mut active = Vec::new();
        for (name, factory) in self.registry.factories().iter() {
            if !self.filter.is_enabled(name) {
                continue;
            }
            let options = CheckOptions::new(name, context.check_options(name));
            let check = match panic::catch_unwind(AssertUnwindSafe(|| factory(&options))) {
                Ok(built) => built?,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    warn!("Check '{}' could not be created: {}", name, reason);
                    context.emit(internal_error(
                        SourceLocation::none(),
                        format!("check '{}' could not be created: {}", name, reason),
                    ));
                    continue;
                }
            };

            let mut finder = MatchFinder::new();
            let registered = panic::catch_unwind(AssertUnwindSafe(|| {
                check.register_queries(&mut finder);
            }));
            if let Err(payload) = registered {
                let reason = panic_message(payload.as_ref());
                warn!("Check '{}' failed to register queries: {}", name, reason);
                context.emit(internal_error(
                    SourceLocation::none(),
                    format!("check '{}' failed to register queries: {}", name, reason),
                ));
                continue;
            }

            debug!(
                "Instantiated check '{}' with {} queries",
                name,
                finder.queries().len()
            );
            active.push(ActiveCheck {
                name: name.to_string(),
                check,
                finder,
            });
        }
        Ok(active)
    }

    /// Runs `checks` over `unit`, then every analyzer with enabled checkers.
    ///
    /// Findings go to `emitter`. A failing check or analyzer is reported as
    /// a [`INTERNAL_ERROR_CHECK`] diagnostic and does not stop the run.
    pub fn run(
        &self,
        unit: &Unit<'_, '_>,
        checks: &[ActiveCheck],
        emitter: &dyn DiagnosticEmitter,
    ) {
        if !checks.is_empty() {
            let mut visitor = MatchVisitor {
                unit,
                checks,
                emitter,
                ancestors: Vec::new(),
            };
            let _ = walk_node(&mut visitor, unit.root);
        }
        self.run_analyzers(unit, emitter);
    }

    fn run_analyzers(&self, unit: &Unit<'_, '_>, emitter: &dyn DiagnosticEmitter) {
        for producer in self.registry.producers() {
            let enabled = analyzer::control_list(self.filter, &producer.checkers());
            if enabled.is_empty() {
                continue;
            }
            debug!(
                "Running analyzer '{}' with {} checkers on {}",
                producer.name(),
                enabled.len(),
                unit.file.display()
            );

            let analysis = AnalysisUnit {
                file: unit.file,
                source: unit.source,
                root: unit.root,
                line_index: unit.line_index,
            };
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| producer.produce(&analysis, &enabled)));
            match flatten(outcome) {
                Ok(findings) => {
                    for finding in findings {
                        if !enabled.contains(&finding.checker) {
                            warn!("Analyzer reported disabled checker '{}'", finding.checker);
                            continue;
                        }
                        emitter.emit(analyzer::to_diagnostic(unit.file, finding));
                    }
                }
                Err(reason) => emitter.emit(internal_error(
                    SourceLocation::new(unit.file, 0),
                    format!("analyzer '{}' failed: {}", producer.name(), reason),
                )),
            }
        }
    }
}

struct MatchVisitor<'v, 'u, 'a> {
    unit: &'v Unit<'u, 'a>,
    checks: &'v [ActiveCheck],
    emitter: &'v dyn DiagnosticEmitter,
    ancestors: Vec<SyntaxNode<'a>>,
}

impl<'a> Visitor<'a> for MatchVisitor<'_, '_, 'a> {
    fn enter_node(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        for active in self.checks {
            for query in active.finder.matching(node) {
                let result = MatchResult {
                    node,
                    ancestors: &self.ancestors,
                    query,
                };
                let ctx = CheckContext::new(
                    &active.name,
                    self.emitter,
                    self.unit.file,
                    self.unit.source,
                    self.unit.line_index,
                );
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| active.check.check(&result, &ctx)));
                if let Err(reason) = flatten(outcome) {
                    warn!(
                        "Check '{}' failed on {}: {}",
                        active.name,
                        self.unit.file.display(),
                        reason
                    );
                    self.emitter.emit(internal_error(
                        SourceLocation::new(self.unit.file, node.span.start),
                        format!("check '{}' failed: {}", active.name, reason),
                    ));
                }
            }
        }
        self.ancestors.push(*node);
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
        self.ancestors.pop();
        ControlFlow::Continue(())
    }
}

fn internal_error(location: SourceLocation, message: String) -> Diagnostic {
    Diagnostic::new(INTERNAL_ERROR_CHECK, location, message).with_severity(Severity::Error)
}

/// Folds a caught panic and a returned error into one failure reason.
fn flatten<T, E: std::fmt::Display>(
    outcome: Result<Result<T, E>, Box<dyn Any + Send>>,
) -> Result<T, String> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{DiagnosticProducer, PathDiagnostic};
    use crate::{DiagnosticContext, LintelConfig};
    use lintel_ast::{AstArena, NodeKind};
    use lintel_parser::{CxxParser, Parser};
    use lintel_plugin::{CheckFactories, PluginError, Query};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Records which check saw which namespace, in invocation order.
    type Log = Arc<Mutex<Vec<String>>>;

    struct Recording {
        label: &'static str,
        log: Log,
    }

    impl Check for Recording {
        fn register_queries(&self, finder: &mut MatchFinder) {
            finder.add_matcher(Query::node(NodeKind::Namespace));
        }

        fn check(
            &self,
            result: &MatchResult<'_, '_>,
            _ctx: &CheckContext<'_>,
        ) -> Result<(), PluginError> {
            let name = result.node.name.unwrap_or("<anon>");
            self.log.lock().push(format!("{}:{}", self.label, name));
            Ok(())
        }
    }

    struct Faulty {
        panic: bool,
    }

    impl Check for Faulty {
        fn register_queries(&self, finder: &mut MatchFinder) {
            finder.add_matcher(Query::named(NodeKind::Namespace, "bad"));
        }

        fn check(
            &self,
            _result: &MatchResult<'_, '_>,
            ctx: &CheckContext<'_>,
        ) -> Result<(), PluginError> {
            let _pending = ctx.report(0, "half-built");
            if self.panic {
                panic!("boom");
            }
            Err(PluginError::check_failed("gave up"))
        }
    }

    fn registry(log: &Log) -> CheckRegistry {
        let mut factories = CheckFactories::new();
        for label in ["second", "first"] {
            let log = Arc::clone(log);
            factories
                .register(format!("test-{label}"), move |_| {
                    Ok(Box::new(Recording {
                        label,
                        log: Arc::clone(&log),
                    }) as Box<dyn Check>)
                })
                .unwrap();
        }
        factories
            .register("test-panics", |_| Ok(Box::new(Faulty { panic: true }) as Box<dyn Check>))
            .unwrap();
        factories
            .register("test-errors", |_| Ok(Box::new(Faulty { panic: false }) as Box<dyn Check>))
            .unwrap();
        CheckRegistry::new(factories)
    }

    fn run(
        registry: &CheckRegistry,
        patterns: &[&str],
        source: &str,
    ) -> (Vec<String>, Vec<Diagnostic>) {
        let filter = ChecksFilter::new(patterns).unwrap();
        let dispatcher = CheckDispatcher::new(registry, &filter);
        let context = DiagnosticContext::new(&LintelConfig::new()).unwrap();
        let checks = dispatcher.create_active_checks(&context).unwrap();
        let names = checks.iter().map(|c| c.name().to_string()).collect();

        let arena = AstArena::new();
        let root = CxxParser::new().parse(&arena, source).unwrap();
        let index = LineIndex::new(source);
        let unit = Unit {
            file: Path::new("unit.cc"),
            source,
            root: &root,
            line_index: &index,
        };
        dispatcher.run(&unit, &checks, &context);
        (names, context.errors())
    }

    #[test]
    fn test_checks_run_in_registration_order() {
        let log = Log::default();
        let registry = registry(&log);
        let (names, _) = run(
            &registry,
            &["test-first", "test-second"],
            "namespace a { namespace b {} }",
        );

        assert_eq!(names, vec!["test-second", "test-first"]);
        assert_eq!(
            *log.lock(),
            vec!["second:a", "first:a", "second:b", "first:b"]
        );
    }

    #[test]
    fn test_disabled_checks_are_not_instantiated() {
        let log = Log::default();
        let registry = registry(&log);
        let patterns = [
            "test-*",
            "-test-second",
            "-test-panics",
            "-test-errors",
        ];
        let (names, _) = run(&registry, &patterns, "namespace a {}");

        assert_eq!(names, vec!["test-first"]);
        assert_eq!(*log.lock(), vec!["first:a"]);
    }

    #[test]
    fn test_failing_checks_are_contained() {
        let log = Log::default();
        let registry = registry(&log);
        let source = "namespace bad {}\nnamespace good {}\n";
        let (_, errors) = run(&registry, &["test-*"], source);

        let internal: Vec<_> = errors
            .iter()
            .filter(|d| d.check_name == INTERNAL_ERROR_CHECK)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            internal,
            vec![
                "check 'test-panics' failed: panicked: boom",
                "check 'test-errors' failed: gave up",
            ]
        );
        assert!(
            errors
                .iter()
                .all(|d| d.severity == Severity::Error || d.check_name == "test-errors")
        );
        // The panicking check's half-built diagnostic is discarded; the
        // erroring one's was finished before it returned.
        assert_eq!(errors.iter().filter(|d| d.message == "half-built").count(), 1);
        // Traversal went on to the next namespace.
        assert!(log.lock().contains(&"first:good".to_string()));
    }

    struct PanicsOnRegister;

    impl Check for PanicsOnRegister {
        fn register_queries(&self, _finder: &mut MatchFinder) {
            panic!("bad registration");
        }

        fn check(
            &self,
            _result: &MatchResult<'_, '_>,
            _ctx: &CheckContext<'_>,
        ) -> Result<(), PluginError> {
            Ok(())
        }
    }

    #[test]
    fn test_checks_failing_to_instantiate_are_left_out() {
        let log = Log::default();
        let mut factories = CheckFactories::new();
        factories
            .register("test-bad-factory", |_| -> Result<Box<dyn Check>, PluginError> {
                panic!("no options for me")
            })
            .unwrap();
        factories
            .register("test-bad-queries", |_| {
                Ok(Box::new(PanicsOnRegister) as Box<dyn Check>)
            })
            .unwrap();
        let recording = Arc::clone(&log);
        factories
            .register("test-first", move |_| {
                Ok(Box::new(Recording {
                    label: "first",
                    log: Arc::clone(&recording),
                }) as Box<dyn Check>)
            })
            .unwrap();
        let registry = CheckRegistry::new(factories);

        let (names, errors) = run(&registry, &["test-*"], "namespace a {}");

        assert_eq!(names, vec!["test-first"]);
        assert_eq!(*log.lock(), vec!["first:a"]);
        let messages: Vec<_> = errors
            .iter()
            .filter(|d| d.check_name == INTERNAL_ERROR_CHECK)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "check 'test-bad-factory' could not be created: panicked: no options for me",
                "check 'test-bad-queries' failed to register queries: panicked: bad registration",
            ]
        );
        assert!(errors.iter().all(|d| d.severity == Severity::Error));
    }

    struct FakeAnalyzer;

    impl DiagnosticProducer for FakeAnalyzer {
        fn name(&self) -> &str {
            "fake"
        }

        fn checkers(&self) -> Vec<String> {
            vec!["core.Null".to_string(), "unix.Malloc".to_string()]
        }

        fn produce(
            &self,
            _unit: &AnalysisUnit<'_, '_>,
            enabled: &[String],
        ) -> Result<Vec<PathDiagnostic>, LintelError> {
            Ok(enabled
                .iter()
                .map(|checker| PathDiagnostic {
                    checker: checker.clone(),
                    offset: 0,
                    message: format!("{checker} finding"),
                    path: Vec::new(),
                })
                .collect())
        }
    }

    #[test]
    fn test_analyzer_pass_runs_after_checks() {
        let log = Log::default();
        let registry = registry(&log).with_producer(Box::new(FakeAnalyzer));
        let (_, errors) = run(&registry, &["analyzer-unix.Malloc"], "namespace a {}");

        let names: Vec<_> = errors.iter().map(|d| d.check_name.as_str()).collect();
        assert_eq!(names, vec!["analyzer-core.Null", "analyzer-unix.Malloc"]);
        assert!(log.lock().is_empty());
    }
}
