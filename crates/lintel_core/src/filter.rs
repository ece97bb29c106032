//! Enable/disable filter for check names.

use globset::{Glob, GlobMatcher};

use crate::LintelError;

#[derive(Debug, Clone)]
struct FilterPattern {
    text: String,
    enable: bool,
    literal: bool,
    matcher: GlobMatcher,
}

/// Decides which checks are active.
///
/// Patterns are globs; a leading `-` disables. The last pattern matching a
/// name decides; a name no pattern matches is disabled.
///
/// ```rust
/// use lintel_core::ChecksFilter;
///
/// let filter = ChecksFilter::new(["-*,llvm-*", "-llvm-include-order"])?;
/// assert!(filter.is_enabled("llvm-namespace-comment"));
/// assert!(!filter.is_enabled("llvm-include-order"));
/// assert!(!filter.is_enabled("google-readability-casting"));
/// # Ok::<(), lintel_core::LintelError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChecksFilter {
    patterns: Vec<FilterPattern>,
}

impl ChecksFilter {
    /// Compiles filter patterns. Each item may hold several comma-separated
    /// patterns; surrounding whitespace and empty entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a pattern that is not a valid glob.
    pub fn new<I, S>(patterns: I) -> Result<Self, LintelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for item in patterns {
            for raw in item.as_ref().split(',').map(str::trim) {
                let (enable, body) = match raw.strip_prefix('-') {
                    Some(body) => (false, body.trim()),
                    None => (true, raw),
                };
                if body.is_empty() {
                    continue;
                }
                let glob = Glob::new(body).map_err(|e| {
                    LintelError::config(format!("Invalid check pattern '{}': {}", raw, e))
                })?;
                compiled.push(FilterPattern {
                    text: body.to_string(),
                    enable,
                    literal: !body.contains(['*', '?', '[', ']', '{', '}']),
                    matcher: glob.compile_matcher(),
                });
            }
        }
        Ok(Self { patterns: compiled })
    }

    /// Returns true if `name` is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .rev()
            .find(|pattern| pattern.matcher.is_match(name))
            .is_some_and(|pattern| pattern.enable)
    }

    /// Returns true if `name` is enabled by a pattern spelling it out.
    ///
    /// Wildcard matches that enable do not count, but a later disabling
    /// pattern still wins.
    pub fn is_explicitly_enabled(&self, name: &str) -> bool {
        for pattern in self.patterns.iter().rev() {
            if !pattern.matcher.is_match(name) {
                continue;
            }
            if !pattern.enable {
                return false;
            }
            if pattern.literal {
                return true;
            }
        }
        false
    }

    /// Returns the compiled patterns as written, with `-` for disabling ones.
    pub fn patterns(&self) -> impl Iterator<Item = String> + '_ {
        self.patterns.iter().map(|pattern| {
            if pattern.enable {
                pattern.text.clone()
            } else {
                format!("-{}", pattern.text)
            }
        })
    }
}
