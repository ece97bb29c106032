//! Parser trait definition.

use lintel_ast::{AstArena, SyntaxNode};

use crate::ParseError;

/// A source parser that produces the outline tree checks are matched against.
///
/// Implementations must be shareable across worker threads; one instance
/// parses every unit with a matching extension.
///
/// ```rust
/// use lintel_ast::{AstArena, NodeKind, Span, SyntaxNode};
/// use lintel_parser::{ParseError, Parser};
///
/// /// Treats every file as one opaque translation unit.
/// struct Opaque;
///
/// impl Parser for Opaque {
///     fn name(&self) -> &str {
///         "opaque"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["inc"]
///     }
///
///     fn parse<'a>(
///         &self,
///         _arena: &'a AstArena,
///         source: &str,
///     ) -> Result<SyntaxNode<'a>, ParseError> {
///         Ok(SyntaxNode::new_parent(
///             NodeKind::TranslationUnit,
///             Span::new(0, source.len() as u32),
///             &[],
///         ))
///     }
/// }
///
/// assert!(Opaque.can_parse("INC"));
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["cpp", "h"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a tree rooted at a
    /// [`NodeKind::TranslationUnit`](lintel_ast::NodeKind::TranslationUnit) node.
    ///
    /// Node names are copied into `arena`, so the tree does not borrow
    /// `source`.
    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<SyntaxNode<'a>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
