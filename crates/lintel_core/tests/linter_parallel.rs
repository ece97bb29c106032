//! Integration tests for whole lint runs.
//!
//! These tests drive the linter over real files on disk, including parallel
//! units, failing checks, conflicting edits and an analyzer.

use std::fs;
use std::path::PathBuf;

use lintel_ast::NodeKind;
use lintel_core::{
    AnalysisUnit, CheckRegistry, DiagnosticProducer, FailureReason, FixStatus, INTERNAL_ERROR_CHECK,
    LintelConfig, LintelError, Linter, PathDiagnostic, PathPiece,
};
use lintel_plugin::{Check, CheckContext, MatchFinder, MatchResult, PluginError, Query};
use tempfile::TempDir;

const UNTERMINATED: &str = "namespace outer {\nint a;\nint b;\nint c;\n}\n";

/// Fails on every namespace called `bad`.
#[derive(Default)]
struct Explosive;

impl Check for Explosive {
    fn register_queries(&self, finder: &mut MatchFinder) {
        finder.add_matcher(Query::named(NodeKind::Namespace, "bad"));
    }

    fn check(
        &self,
        _result: &MatchResult<'_, '_>,
        _ctx: &CheckContext<'_>,
    ) -> Result<(), PluginError> {
        panic!("unexpected namespace");
    }
}

/// Offers two overlapping renames of every namespace name.
#[derive(Default)]
struct Renamer;

impl Check for Renamer {
    fn register_queries(&self, finder: &mut MatchFinder) {
        finder.add_matcher(Query::node(NodeKind::Namespace));
    }

    fn check(
        &self,
        result: &MatchResult<'_, '_>,
        ctx: &CheckContext<'_>,
    ) -> Result<(), PluginError> {
        let Some(ns) = result.node.as_namespace() else {
            return Ok(());
        };
        let Some(span) = ns.name_span else {
            return Ok(());
        };
        ctx.report(span.start, "rename to first")
            .with_edit(ctx.replacement(span, "first"));
        ctx.report(span.start, "rename to second")
            .with_edit(ctx.replacement(span, "second"));
        Ok(())
    }
}

/// Cannot even say what it wants to match.
#[derive(Default)]
struct Unregistrable;

impl Check for Unregistrable {
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

struct FakeAnalyzer;

impl DiagnosticProducer for FakeAnalyzer {
    fn name(&self) -> &str {
        "fake"
    }

    fn checkers(&self) -> Vec<String> {
        ["core.DivideZero", "core.NullDereference", "unix.Malloc", "debug.DumpCFG"]
            .iter()
            .map(|s| s.to_string())
            .collect()
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
                path: vec![
                    PathPiece {
                        offset: 0,
                        message: "step one".to_string(),
                    },
                    PathPiece {
                        offset: 10,
                        message: "step two".to_string(),
                    },
                ],
            })
            .collect())
    }
}

fn registry() -> CheckRegistry {
    let mut factories = lintel_checks::builtin_factories().unwrap();
    factories.register_default::<Explosive>("demo-explosive").unwrap();
    factories.register_default::<Renamer>("demo-renamer").unwrap();
    factories
        .register_default::<Unregistrable>("demo-unregistrable")
        .unwrap();
    CheckRegistry::new(factories)
}

fn config(checks: &[&str]) -> LintelConfig {
    let mut config = LintelConfig::new();
    config.checks = checks.iter().map(|s| s.to_string()).collect();
    config
}

fn write(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_lint_many_files_in_parallel() {
    let temp = TempDir::new().unwrap();
    let files: Vec<PathBuf> = (0..32)
        .map(|i| write(&temp, &format!("unit{i:02}.cc"), UNTERMINATED))
        .collect();

    let linter = Linter::new(LintelConfig::new(), registry()).unwrap();
    let run = linter.lint_files(&files).unwrap();

    assert!(run.failures.is_empty());
    assert_eq!(run.diagnostics.len(), 32);
    assert_eq!(run.stats.total_fixes_offered, 32);
    let reported: Vec<_> = run.diagnostics.iter().map(|d| d.location.file.clone()).collect();
    assert_eq!(reported, files);
}

#[test]
fn test_failing_check_does_not_block_other_units() {
    let temp = TempDir::new().unwrap();
    let a = write(&temp, "a.cc", "namespace bad { }\n");
    let b = write(&temp, "b.cc", UNTERMINATED);

    let linter = Linter::new(config(&["llvm-*", "demo-explosive"]), registry()).unwrap();
    let run = linter.lint_files(&[a.clone(), b.clone()]).unwrap();

    assert!(run.failures.is_empty());
    let names: Vec<_> = run
        .diagnostics
        .iter()
        .map(|d| (d.check_name.as_str(), d.location.file.clone()))
        .collect();
    assert_eq!(
        names,
        vec![
            (INTERNAL_ERROR_CHECK, a),
            ("llvm-namespace-comment", b),
        ]
    );
    assert!(run.diagnostics[0].message.contains("check 'demo-explosive' failed"));
    assert!(run.has_errors());
}

#[test]
fn test_check_panicking_on_registration_does_not_abort_run() {
    let temp = TempDir::new().unwrap();
    let files: Vec<PathBuf> = (0..4)
        .map(|i| write(&temp, &format!("unit{i}.cc"), UNTERMINATED))
        .collect();

    let linter = Linter::new(config(&["llvm-*", "demo-unregistrable"]), registry()).unwrap();
    let run = linter.lint_files(&files).unwrap();

    assert!(run.failures.is_empty());
    let internal: Vec<_> = run
        .diagnostics
        .iter()
        .filter(|d| d.check_name == INTERNAL_ERROR_CHECK)
        .collect();
    assert_eq!(internal.len(), 1);
    assert!(
        internal[0]
            .message
            .contains("check 'demo-unregistrable' failed to register queries")
    );
    let llvm = run
        .diagnostics
        .iter()
        .filter(|d| d.check_name == "llvm-namespace-comment")
        .count();
    assert_eq!(llvm, 4);
    assert!(run.has_errors());
}

#[test]
fn test_overlapping_edits_apply_once() {
    let temp = TempDir::new().unwrap();
    let a = write(&temp, "a.cc", "namespace old {\n}\n");

    let linter = Linter::new(config(&["demo-renamer"]), registry()).unwrap();
    let mut run = linter.lint_files(&[a.clone()]).unwrap();
    let outcome = linter.apply_fixes(&mut run, true);

    assert_eq!((outcome.applied, outcome.offered), (1, 2));
    assert_eq!(fs::read_to_string(&a).unwrap(), "namespace first {\n}\n");
    let second = &run.diagnostics[1].edits[0];
    assert_eq!(
        outcome.status_of(second),
        Some(&FixStatus::Failed(FailureReason::Conflict))
    );
}

#[test]
fn test_wrong_name_comment_is_corrected() {
    let temp = TempDir::new().unwrap();
    let a = write(
        &temp,
        "a.cc",
        "namespace right {\nint a;\nint b;\nint c;\n} // namespace wrong\n",
    );

    let linter = Linter::new(LintelConfig::new(), registry()).unwrap();
    let mut run = linter.lint_files(&[a.clone()]).unwrap();
    assert_eq!(run.diagnostics.len(), 1);
    assert_eq!(run.diagnostics[0].edits.len(), 1);

    linter.apply_fixes(&mut run, true);
    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        "namespace right {\nint a;\nint b;\nint c;\n} // namespace right\n"
    );
}

#[test]
fn test_file_without_findings_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let content = "namespace a {\nint x;\n} // namespace a\n";
    let a = write(&temp, "a.cc", content);

    let linter = Linter::new(LintelConfig::new(), registry()).unwrap();
    let mut run = linter.lint_files(&[a.clone()]).unwrap();
    assert!(run.diagnostics.is_empty());

    linter.apply_fixes(&mut run, false);
    linter.apply_fixes(&mut run, true);
    assert_eq!(fs::read_to_string(&a).unwrap(), content);
}

#[test]
fn test_analyzer_pulls_in_core_checkers() {
    let temp = TempDir::new().unwrap();
    let a = write(&temp, "a.cc", "int x;\n");

    let registry = registry().with_producer(Box::new(FakeAnalyzer));
    let linter = Linter::new(config(&["-*", "analyzer-unix.Malloc"]), registry).unwrap();

    assert_eq!(
        linter.check_names(),
        vec![
            "analyzer-core.DivideZero",
            "analyzer-core.NullDereference",
            "analyzer-unix.Malloc",
        ]
    );

    let run = linter.lint_files(&[a]).unwrap();
    let malloc = run
        .diagnostics
        .iter()
        .find(|d| d.check_name == "analyzer-unix.Malloc")
        .unwrap();
    assert!(malloc.edits.is_empty());
    assert_eq!(malloc.notes.len(), 2);
    assert_eq!(run.diagnostics.len(), 3);
}

#[test]
fn test_nolint_suppresses_and_counts() {
    let temp = TempDir::new().unwrap();
    let a = write(
        &temp,
        "a.cc",
        "namespace outer { // NOLINT(llvm-namespace-comment)\nint a;\nint b;\n}\n",
    );

    let mut config = LintelConfig::new();
    config.count_ignored_fixes = true;
    let linter = Linter::new(config, registry()).unwrap();
    let run = linter.lint_files(&[a]).unwrap();

    assert!(run.diagnostics.is_empty());
    assert_eq!(run.stats.errors_ignored, 1);
    assert_eq!(run.stats.total_fixes_offered, 1);
}

#[test]
fn test_duplicate_check_name_is_fatal() {
    let mut factories = lintel_checks::builtin_factories().unwrap();
    let err = factories
        .register_default::<Renamer>("llvm-namespace-comment")
        .unwrap_err();
    assert!(LintelError::from(err).is_fatal());
}
