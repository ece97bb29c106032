//! Integration tests for the llvm-namespace-comment check
//!
//! Tests the full pipeline from file discovery through fix application
//! using the built binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cxx")
}

fn lintel_cmd() -> Command {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("Failed to find workspace root");
    let bin_path = workspace_root.join("target/debug/lintel");
    let mut cmd = Command::new(bin_path);
    cmd.arg("--config").arg(fixtures_dir().join("../lintel.jsonc"));
    cmd
}

/// Copies a fixture into a scratch directory so fixes can rewrite it.
fn scratch_copy(name: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(name);
    fs::copy(fixtures_dir().join(name), &path).unwrap();
    (temp, path)
}

mod valid_cases {
    use super::*;

    #[test]
    fn allows_terminated_namespaces() {
        lintel_cmd()
            .arg("check")
            .arg(fixtures_dir().join("valid.cc"))
            .assert()
            .success()
            .stdout(predicate::str::contains("llvm-namespace-comment").not());
    }

    #[test]
    fn honours_nolintnextline() {
        lintel_cmd()
            .arg("check")
            .arg(fixtures_dir().join("suppressed.cc"))
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}

mod invalid_cases {
    use super::*;

    #[test]
    fn detects_missing_comment() {
        lintel_cmd()
            .arg("check")
            .arg(fixtures_dir().join("missing_comment.cc"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "missing_comment.cc:1:11: warning: namespace not terminated with a closing comment",
            ));
    }

    #[test]
    fn detects_wrong_name() {
        lintel_cmd()
            .arg("check")
            .arg(fixtures_dir().join("wrong_name.cc"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "namespace closing comment refers to a wrong namespace 'wrong'",
            ));
    }

    #[test]
    fn checks_the_whole_directory() {
        lintel_cmd()
            .arg("check")
            .arg(fixtures_dir())
            .assert()
            .success()
            .stdout(predicate::str::contains("missing_comment.cc"))
            .stdout(predicate::str::contains("wrong_name.cc"))
            .stdout(predicate::str::contains("block_comment.cc"))
            .stdout(predicate::str::contains("valid.cc").not());
    }
}

mod fixes {
    use super::*;

    #[test]
    fn inserts_missing_comment() {
        let (_temp, path) = scratch_copy("missing_comment.cc");

        lintel_cmd()
            .arg("check")
            .arg(&path)
            .arg("--fix")
            .assert()
            .success()
            .stdout(predicate::str::contains("applied 1 of 1 suggested fixes"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "namespace unterminated {\nint a;\nint b;\nint c;\n} // namespace unterminated\n"
        );
    }

    #[test]
    fn corrects_wrong_name() {
        let (_temp, path) = scratch_copy("wrong_name.cc");

        lintel_cmd().arg("check").arg(&path).arg("--fix").assert().success();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "namespace right {\nint a;\nint b;\n} // namespace right\n"
        );
    }

    #[test]
    fn replaces_block_comment_with_line_comment() {
        let (_temp, path) = scratch_copy("block_comment.cc");

        lintel_cmd().arg("check").arg(&path).arg("--fix").assert().success();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "namespace a::b {\nint x;\n} // namespace a::b\n\n"
        );

        lintel_cmd()
            .arg("check")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}
