//! Syntax node kinds.

use serde::{Deserialize, Serialize};

/// The kind of a [`SyntaxNode`](crate::SyntaxNode).
///
/// The tree is an outline rather than a full syntax tree: it records the
/// structure checks query for (declarations that open scopes, comments,
/// directives) and leaves expressions to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a parsed file.
    TranslationUnit,
    /// `namespace name { ... }`, `inline namespace`, or an anonymous namespace.
    Namespace,
    /// Any other brace-delimited region (class body, function body, initializer).
    Block,
    /// A `//` or `/* */` comment.
    Comment,
    /// A preprocessor directive line.
    Directive,
}

impl NodeKind {
    /// Returns true if nodes of this kind can contain children.
    #[inline]
    pub const fn is_parent(&self) -> bool {
        matches!(
            self,
            NodeKind::TranslationUnit | NodeKind::Namespace | NodeKind::Block
        )
    }

    /// Returns the kind name as used in query descriptions.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeKind::TranslationUnit => "translationUnit",
            NodeKind::Namespace => "namespaceDecl",
            NodeKind::Block => "block",
            NodeKind::Comment => "comment",
            NodeKind::Directive => "directive",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
