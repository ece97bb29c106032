//! Human-readable rendering of a run's diagnostics.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lintel_ast::{LineIndex, Position};
use lintel_plugin::{Diagnostic, Edit, Severity, SourceLocation};

use crate::fixer::{FixOutcome, FixStatus};
use crate::{LintelError, SourceMap};

struct RenderedFile {
    source: Arc<str>,
    index: LineIndex,
}

/// Writes diagnostics in the `file:line:col: severity: message [check]`
/// format, followed by the source line, a caret, and fix-it markers.
pub struct ErrorReporter<'s, W: Write> {
    out: W,
    sources: &'s SourceMap,
    files: HashMap<PathBuf, Option<RenderedFile>>,
}

impl<'s, W: Write> ErrorReporter<'s, W> {
    /// Creates a reporter. Source lines are read from `sources`.
    pub fn new(out: W, sources: &'s SourceMap) -> Self {
        Self {
            out,
            sources,
            files: HashMap::new(),
        }
    }

    /// Renders every diagnostic in order.
    pub fn report_all(
        &mut self,
        diagnostics: &[Diagnostic],
        outcome: Option<&FixOutcome>,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.report_diagnostic(diagnostic, outcome)?;
        }
        Ok(())
    }

    /// Renders one diagnostic, its fix-it markers and its notes.
    ///
    /// With an `outcome`, every edit is followed by a note telling whether
    /// it was applied.
    pub fn report_diagnostic(
        &mut self,
        diagnostic: &Diagnostic,
        outcome: Option<&FixOutcome>,
    ) -> io::Result<()> {
        self.write_header(&diagnostic.location, diagnostic.severity, &diagnostic.message)?;
        writeln!(self.out, " [{}]", diagnostic.check_name)?;
        let line = self.write_snippet(&diagnostic.location)?;

        for edit in &diagnostic.edits {
            self.write_fix_it(edit, line.filter(|_| edit.targets(&diagnostic.location.file)))?;
        }

        if let Some(outcome) = outcome {
            for edit in &diagnostic.edits {
                let message = match outcome.status_of(edit) {
                    Some(FixStatus::Applied) => {
                        "FIX-IT applied suggested code changes".to_string()
                    }
                    Some(FixStatus::Failed(reason)) => format!("FIX-IT failed: {reason}"),
                    None => continue,
                };
                self.write_header(&edit.location(), Severity::Note, &message)?;
                writeln!(self.out)?;
            }
        }

        for note in &diagnostic.notes {
            self.report_note(note)?;
        }
        Ok(())
    }

    fn report_note(&mut self, note: &Diagnostic) -> io::Result<()> {
        self.write_header(&note.location, Severity::Note, &note.message)?;
        writeln!(self.out)?;
        self.write_snippet(&note.location)?;
        for nested in &note.notes {
            self.report_note(nested)?;
        }
        Ok(())
    }

    /// Renders a unit that could not be processed.
    pub fn report_failure(&mut self, path: &Path, error: &LintelError) -> io::Result<()> {
        writeln!(self.out, "{}: error: {}", path.display(), error)
    }

    /// Prints the fix summary of `outcome`, if any fixes were offered.
    ///
    /// `outcome` is present only when fixes were requested.
    pub fn finish(&mut self, outcome: Option<&FixOutcome>) -> io::Result<()> {
        if let Some(outcome) = outcome.filter(|o| o.offered > 0) {
            writeln!(
                self.out,
                "applied {} of {} suggested fixes",
                outcome.applied, outcome.offered
            )?;
        }
        self.out.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(
        &mut self,
        location: &SourceLocation,
        severity: Severity,
        message: &str,
    ) -> io::Result<()> {
        if location.has_file() {
            match self.position(location) {
                Some(pos) => write!(
                    self.out,
                    "{}:{}:{}: ",
                    location.file.display(),
                    pos.line,
                    pos.column
                )?,
                None => write!(self.out, "{}: ", location.file.display())?,
            }
        }
        write!(self.out, "{severity}: {message}")
    }

    /// Writes the source line and caret. Returns the line number rendered.
    fn write_snippet(&mut self, location: &SourceLocation) -> io::Result<Option<u32>> {
        if !location.has_file() {
            return Ok(None);
        }
        let Some((pos, text)) = self.line_at(&location.file, location.offset) else {
            return Ok(None);
        };
        writeln!(self.out, "{text}")?;
        writeln!(self.out, "{}^", padding(&text, pos.column))?;
        Ok(Some(pos.line))
    }

    /// Writes a fix-it marker under the snippet when the edit is on the
    /// rendered line, or on its own source line otherwise.
    fn write_fix_it(&mut self, edit: &Edit, snippet_line: Option<u32>) -> io::Result<()> {
        let replacement = format!("{:?}", edit.replacement_text);
        let Some((start, text)) = self.line_at(&edit.file, edit.offset) else {
            return writeln!(self.out, "fix-it: {replacement}");
        };

        let visible = text.len().saturating_sub(start.column as usize - 1);
        let marker = if edit.length == 0 {
            "^".to_string()
        } else {
            "~".repeat((edit.length as usize).clamp(1, visible.max(1)))
        };

        if snippet_line != Some(start.line) {
            writeln!(self.out, "{text}")?;
        }
        writeln!(
            self.out,
            "{}{marker} fix-it: {replacement}",
            padding(&text, start.column)
        )
    }

    fn line_at(&mut self, path: &Path, offset: u32) -> Option<(Position, String)> {
        let file = self.file(path)?;
        let pos = file.index.position(offset);
        let text = file.index.line_text(pos.line, &file.source)?;
        Some((pos, text.to_string()))
    }

    fn position(&mut self, location: &SourceLocation) -> Option<Position> {
        self.file(&location.file)
            .map(|file| file.index.position(location.offset))
    }

    fn file(&mut self, path: &Path) -> Option<&RenderedFile> {
        let sources = self.sources;
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                sources.load(path).ok().map(|source| RenderedFile {
                    index: LineIndex::new(&source),
                    source,
                })
            })
            .as_ref()
    }
}

/// Whitespace that lines a marker up under `column`, keeping tabs.
fn padding(line: &str, column: u32) -> String {
    line.bytes()
        .take(column.saturating_sub(1) as usize)
        .filter(|b| (*b & 0xC0) != 0x80)
        .map(|b| if b == b'\t' { '\t' } else { ' ' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::{FailureReason, FixAttempt};
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "namespace a {\nint x;\n}\n";

    fn sources() -> SourceMap {
        let sources = SourceMap::new();
        sources.insert("a.cc", SOURCE);
        sources
    }

    fn missing_comment() -> Diagnostic {
        Diagnostic::new(
            "llvm-namespace-comment",
            SourceLocation::new("a.cc", 10),
            "namespace not terminated with a closing comment",
        )
        .with_edit(Edit::insertion("a.cc", 22, " // namespace a"))
        .with_note(SourceLocation::new("a.cc", 0), "namespace starts here")
    }

    fn render(diagnostics: &[Diagnostic], outcome: Option<&FixOutcome>) -> String {
        let sources = sources();
        let mut reporter = ErrorReporter::new(Vec::new(), &sources);
        reporter.report_all(diagnostics, outcome).unwrap();
        reporter.finish(outcome).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_renders_snippet_fix_it_and_notes() {
        let output = render(&[missing_comment()], None);
        insta::assert_snapshot!(output, @r#"
a.cc:1:11: warning: namespace not terminated with a closing comment [llvm-namespace-comment]
namespace a {
          ^
}
 ^ fix-it: " // namespace a"
a.cc:1:1: note: namespace starts here
namespace a {
^
"#);
    }

    #[test]
    fn test_replacement_marker_on_same_line() {
        let diag = Diagnostic::new("demo", SourceLocation::new("a.cc", 14), "rename")
            .with_edit(Edit::replacement("a.cc", lintel_ast::Span::new(18, 19), "y"));
        let output = render(&[diag], None);
        assert_eq!(
            output,
            "a.cc:2:1: warning: rename [demo]\nint x;\n^\n    ~ fix-it: \"y\"\n"
        );
    }

    #[test]
    fn test_fix_outcome_notes() {
        let diag = missing_comment();
        let outcome = FixOutcome {
            offered: 1,
            applied: 0,
            attempts: vec![FixAttempt {
                edit: diag.edits[0].clone(),
                status: FixStatus::Failed(FailureReason::Conflict),
            }],
            ..FixOutcome::default()
        };
        let output = render(&[diag], Some(&outcome));

        assert!(output.contains(
            "a.cc:3:2: note: FIX-IT failed: edit conflicts with an applied edit\n"
        ));
        assert!(output.ends_with("applied 0 of 1 suggested fixes\n"));
    }

    #[test]
    fn test_synthetic_diagnostic_has_no_location() {
        let diag = Diagnostic::new("lintel-internal-error", SourceLocation::none(), "boom")
            .with_severity(Severity::Error);
        let output = render(&[diag], None);
        assert_eq!(output, "error: boom [lintel-internal-error]\n");
    }

    #[test]
    fn test_summary_needs_fix_request_and_offers() {
        let outcome = FixOutcome {
            offered: 2,
            applied: 1,
            ..FixOutcome::default()
        };
        assert_eq!(render(&[], None), "");
        assert_eq!(render(&[], Some(&FixOutcome::default())), "");
        assert_eq!(render(&[], Some(&outcome)), "applied 1 of 2 suggested fixes\n");
    }

    #[test]
    fn test_unreadable_file_renders_path_only() {
        let diag = Diagnostic::new("demo", SourceLocation::new("/nonexistent/x.cc", 4), "msg");
        let output = render(&[diag], None);
        assert_eq!(output, "/nonexistent/x.cc: warning: msg [demo]\n");
    }

    #[test]
    fn test_padding_keeps_tabs() {
        assert_eq!(padding("\tint x;", 6), "\t    ");
        assert_eq!(padding("é = 1;", 4), "  ");
    }
}
