//! The capability contract every check implements.

use std::path::Path;

use lintel_ast::{LineIndex, Span};
use serde_json::Value;

use crate::{
    Diagnostic, DiagnosticBuilder, DiagnosticEmitter, Edit, MatchFinder, MatchResult, PluginError,
    Severity, SourceLocation,
};

/// A check plugin.
///
/// An instance is created by its factory for one translation unit and
/// dropped when that unit is done, so a check never carries state across
/// files. Its name is assigned by the factory binding and reaches the check
/// through [`CheckContext::name`].
pub trait Check: Send {
    /// Registers the queries whose matches this check wants to see.
    fn register_queries(&self, finder: &mut MatchFinder);

    /// Handles one match.
    ///
    /// Returning `Err` (or panicking) is contained by the dispatcher and
    /// reported as an internal error for this match only.
    fn check(
        &self,
        result: &MatchResult<'_, '_>,
        ctx: &CheckContext<'_>,
    ) -> Result<(), PluginError>;
}

/// Options handed to a check factory.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions<'o> {
    name: &'o str,
    value: Option<&'o Value>,
}

impl<'o> CheckOptions<'o> {
    /// Wraps the configured options of check `name`.
    pub fn new(name: &'o str, value: Option<&'o Value>) -> Self {
        Self { name, value }
    }

    /// Returns the name the check is being created under.
    pub fn name(&self) -> &'o str {
        self.name
    }

    /// Returns the raw option value for `key`.
    pub fn get(&self, key: &str) -> Option<&'o Value> {
        self.value.and_then(|value| value.get(key))
    }

    /// Reads an unsigned integer option, falling back to `default`.
    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64, PluginError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.as_u64().ok_or_else(|| {
                PluginError::invalid_options(
                    self.name,
                    format!("'{key}' must be a non-negative integer, got {value}"),
                )
            }),
        }
    }

    /// Reads a boolean option, falling back to `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, PluginError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| {
                PluginError::invalid_options(self.name, format!("'{key}' must be a boolean"))
            }),
        }
    }
}

/// What a check sees of the unit it is running on.
pub struct CheckContext<'c> {
    name: &'c str,
    emitter: &'c dyn DiagnosticEmitter,
    file: &'c Path,
    source: &'c str,
    line_index: &'c LineIndex,
}

impl<'c> CheckContext<'c> {
    /// Creates the context for check `name` on one unit.
    pub fn new(
        name: &'c str,
        emitter: &'c dyn DiagnosticEmitter,
        file: &'c Path,
        source: &'c str,
        line_index: &'c LineIndex,
    ) -> Self {
        Self {
            name,
            emitter,
            file,
            source,
            line_index,
        }
    }

    /// Returns the name the check runs under.
    pub fn name(&self) -> &'c str {
        self.name
    }

    /// Returns the path of the unit.
    pub fn file(&self) -> &'c Path {
        self.file
    }

    /// Returns the unit's source text.
    pub fn source(&self) -> &'c str {
        self.source
    }

    /// Returns the unit's line index.
    pub fn line_index(&self) -> &'c LineIndex {
        self.line_index
    }

    /// Returns the configured options of this check.
    pub fn options(&self) -> Option<&'c Value> {
        self.emitter.check_options(self.name)
    }

    /// Returns a location in this unit.
    pub fn location(&self, offset: u32) -> SourceLocation {
        SourceLocation::new(self.file, offset)
    }

    /// Starts a warning at `offset`.
    pub fn report(&self, offset: u32, message: impl Into<String>) -> DiagnosticBuilder<'c> {
        self.report_with_severity(offset, message, Severity::Warning)
    }

    /// Starts a diagnostic at `offset` with an explicit severity.
    pub fn report_with_severity(
        &self,
        offset: u32,
        message: impl Into<String>,
        severity: Severity,
    ) -> DiagnosticBuilder<'c> {
        let diagnostic =
            Diagnostic::new(self.name, self.location(offset), message).with_severity(severity);
        DiagnosticBuilder::new(self.emitter, diagnostic)
    }

    /// Creates an edit inserting `text` at `offset` in this unit.
    pub fn insertion(&self, offset: u32, text: impl Into<String>) -> Edit {
        Edit::insertion(self.file, offset, text)
    }

    /// Creates an edit replacing `span` in this unit.
    pub fn replacement(&self, span: Span, text: impl Into<String>) -> Edit {
        Edit::replacement(self.file, span, text)
    }

    /// Returns the source text of `span`, if it is in range.
    pub fn text(&self, span: Span) -> Option<&'c str> {
        self.source.get(span.start as usize..span.end as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rstest::rstest;
    use serde_json::json;

    struct Sink {
        emitted: Mutex<Vec<Diagnostic>>,
        options: Value,
    }

    impl DiagnosticEmitter for Sink {
        fn emit(&self, diagnostic: Diagnostic) {
            self.emitted.lock().push(diagnostic);
        }

        fn check_options(&self, check_name: &str) -> Option<&Value> {
            self.options.get(check_name)
        }
    }

    #[test]
    fn test_report_attributes_name_and_file() {
        let sink = Sink {
            emitted: Mutex::new(Vec::new()),
            options: json!({ "demo": { "limit": 3 } }),
        };
        let source = "int x;\n";
        let index = LineIndex::new(source);
        let ctx = CheckContext::new("demo", &sink, Path::new("a.cc"), source, &index);

        ctx.report(4, "found x")
            .with_edit(ctx.replacement(Span::new(4, 5), "y"));

        let emitted = sink.emitted.lock();
        assert_eq!(emitted[0].check_name, "demo");
        assert_eq!(emitted[0].location, SourceLocation::new("a.cc", 4));
        assert_eq!(emitted[0].severity, Severity::Warning);
        assert_eq!(emitted[0].edits[0].replacement_text, "y");
        assert_eq!(ctx.options().and_then(|o| o["limit"].as_u64()), Some(3));
        assert_eq!(ctx.text(Span::new(0, 3)), Some("int"));
    }

    #[rstest]
    #[case::absent(None, Ok(1))]
    #[case::present(Some(json!({ "lines": 10 })), Ok(10))]
    #[case::negative(Some(json!({ "lines": -1 })), Err(()))]
    #[case::string(Some(json!({ "lines": "ten" })), Err(()))]
    fn test_u64_option(#[case] value: Option<Value>, #[case] expected: Result<u64, ()>) {
        let options = CheckOptions::new("demo", value.as_ref());
        assert_eq!(options.u64_or("lines", 1).map_err(|_| ()), expected);
    }

    #[test]
    fn test_bool_option() {
        let value = json!({ "strict": true });
        let options = CheckOptions::new("demo", Some(&value));
        assert!(options.bool_or("strict", false).unwrap());
        assert!(!options.bool_or("other", false).unwrap());
        assert_eq!(options.name(), "demo");
    }
}
