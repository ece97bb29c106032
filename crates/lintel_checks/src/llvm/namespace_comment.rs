//! `llvm-namespace-comment`: long namespaces end with a closing comment.
//!
//! ```text
//! namespace foo {
//! ...
//! } // namespace foo
//! ```

use lintel_ast::{NodeKind, Span};
use lintel_plugin::{
    Check, CheckContext, CheckOptions, MatchFinder, MatchResult, PluginError, Query,
};
use regex::{Regex, RegexBuilder};

/// Name the check is registered under.
pub const NAME: &str = "llvm-namespace-comment";

const COMMENT_PATTERN: &str =
    r"^/[/*] *(end (of )?)? *(anonymous|unnamed)? *namespace( +([a-zA-Z0-9_:]+))? *(\*/)?$";

/// Compiles the recognised closing-comment grammar.
pub fn comment_pattern() -> Result<Regex, PluginError> {
    RegexBuilder::new(COMMENT_PATTERN)
        .case_insensitive(true)
        .build()
        .map_err(|e| PluginError::internal(format!("invalid namespace comment pattern: {e}")))
}

/// Checks that namespaces longer than `short_namespace_lines` are closed
/// with `// namespace <name>`.
#[derive(Debug, Clone)]
pub struct NamespaceCommentCheck {
    pattern: Regex,
    short_namespace_lines: u32,
}

impl NamespaceCommentCheck {
    /// Creates the check, reading `short_namespace_lines` (default 1).
    pub fn new(pattern: Regex, options: &CheckOptions<'_>) -> Result<Self, PluginError> {
        let lines = options.u64_or("short_namespace_lines", 1)?;
        Ok(Self {
            pattern,
            short_namespace_lines: u32::try_from(lines).unwrap_or(u32::MAX),
        })
    }
}

fn closing_comment(name: Option<&str>, line_break: bool) -> String {
    let mut text = String::from("// namespace");
    if let Some(name) = name {
        text.push(' ');
        text.push_str(name);
    }
    if line_break {
        text.push('\n');
    }
    text
}

/// Returns the offset of the first non-whitespace byte at or after `from`.
fn next_token(source: &str, from: usize) -> Option<usize> {
    source
        .as_bytes()
        .get(from..)?
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|i| from + i)
}

/// Returns the span of the comment starting at `at`, if one does.
fn comment_at(source: &str, at: usize) -> Option<Span> {
    let rest = source.get(at..)?;
    let len = if rest.starts_with("//") {
        let line = rest.find('\n').unwrap_or(rest.len());
        rest[..line].trim_end_matches('\r').len()
    } else if rest.starts_with("/*") {
        rest[2..].find("*/").map_or(rest.len(), |i| i + 4)
    } else {
        return None;
    };
    Some(Span::new(at as u32, (at + len) as u32))
}

impl Check for NamespaceCommentCheck {
    fn register_queries(&self, finder: &mut MatchFinder) {
        finder.add_matcher(Query::node(NodeKind::Namespace));
    }

    fn check(
        &self,
        result: &MatchResult<'_, '_>,
        ctx: &CheckContext<'_>,
    ) -> Result<(), PluginError> {
        let node = result.node;
        let data = node
            .as_namespace()
            .ok_or_else(|| PluginError::check_failed("matched node is not a namespace"))?;
        let source = ctx.source();
        let index = ctx.line_index();

        let start_line = index.line(node.span.start);
        let end_line = index.line(data.rbrace);
        if end_line.saturating_sub(start_line) + 1 <= self.short_namespace_lines {
            return Ok(());
        }

        let after_rbrace = data.rbrace + 1;
        let next = next_token(source, after_rbrace as usize)
            .filter(|&at| index.line(at as u32) == end_line);
        // A comment inserted in front of a token on the same line needs a break.
        let mut line_break = next.is_some();

        if let Some(comment) = next.and_then(|at| comment_at(source, at)) {
            let text = ctx.text(comment).unwrap_or_default();
            if let Some(groups) = self.pattern.captures(text) {
                let named = groups.get(5).map_or("", |m| m.as_str());
                if named == node.name.unwrap_or_default() {
                    return Ok(());
                }

                let line_break = text.starts_with("/*");
                ctx.report(
                    comment.start,
                    format!("namespace closing comment refers to a wrong namespace '{named}'"),
                )
                .with_edit(ctx.replacement(comment, closing_comment(node.name, line_break)));
                return Ok(());
            }

            // Unrecognised line comments stay where they are; block comments
            // move to the next line.
            if text.starts_with("//") {
                line_break = false;
            }
        }

        let at = data.name_span.map_or(data.keyword.start, |span| span.start);
        ctx.report(at, "namespace not terminated with a closing comment")
            .with_edit(ctx.insertion(
                after_rbrace,
                format!(" {}", closing_comment(node.name, line_break)),
            ));
        Ok(())
    }
}
