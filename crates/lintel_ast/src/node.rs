//! SyntaxNode definition.

use serde::Serialize;

use crate::{NodeKind, Span};

/// A node in the outline syntax tree.
///
/// Nodes are `Copy` and borrow their children and names from an
/// [`AstArena`](crate::AstArena), so a whole tree is released at once when
/// the arena is dropped.
///
/// # Example
///
/// ```rust
/// use lintel_ast::{AstArena, NodeKind, Span, SyntaxNode};
///
/// let arena = AstArena::new();
/// let comment = SyntaxNode::leaf(NodeKind::Comment, Span::new(0, 8));
/// let root = SyntaxNode::new_parent(
///     NodeKind::TranslationUnit,
///     Span::new(0, 8),
///     arena.alloc_children(vec![comment]),
/// );
/// assert_eq!(root.children.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyntaxNode<'a> {
    /// The kind of this node.
    pub kind: NodeKind,

    /// Byte span in the source text.
    pub span: Span,

    /// Child nodes, in source order.
    pub children: &'a [SyntaxNode<'a>],

    /// Declared name, if the node declares one.
    pub name: Option<&'a str>,

    /// Kind-specific data.
    pub data: NodeData,
}

/// Kind-specific node data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeData {
    #[default]
    None,
    Namespace(NamespaceData),
    Comment(CommentStyle),
}

/// Data attached to [`NodeKind::Namespace`] nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceData {
    /// Span of the `namespace` keyword.
    pub keyword: Span,
    /// Span of the declared name, empty for anonymous namespaces.
    pub name_span: Option<Span>,
    /// Offset of the closing brace.
    pub rbrace: u32,
    /// Whether the namespace was declared `inline`.
    pub is_inline: bool,
}

/// Whether a comment is a `//` line comment or a `/* */` block comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Block,
}

impl<'a> Serialize for SyntaxNode<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut len = 2;
        if self.kind.is_parent() {
            len += 1;
        }
        if self.name.is_some() {
            len += 1;
        }

        let mut state = serializer.serialize_struct("SyntaxNode", len)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("range", &[self.span.start, self.span.end])?;
        if let Some(name) = self.name {
            state.serialize_field("name", name)?;
        }
        if self.kind.is_parent() {
            state.serialize_field("children", &self.children)?;
        }
        state.end()
    }
}

impl<'a> SyntaxNode<'a> {
    /// Creates a new parent node with children.
    #[inline]
    pub const fn new_parent(kind: NodeKind, span: Span, children: &'a [SyntaxNode<'a>]) -> Self {
        Self {
            kind,
            span,
            children,
            name: None,
            data: NodeData::None,
        }
    }

    /// Creates a node without children.
    #[inline]
    pub const fn leaf(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: &[],
            name: None,
            data: NodeData::None,
        }
    }

    /// Creates a namespace node.
    #[inline]
    pub const fn namespace(
        span: Span,
        name: Option<&'a str>,
        data: NamespaceData,
        children: &'a [SyntaxNode<'a>],
    ) -> Self {
        Self {
            kind: NodeKind::Namespace,
            span,
            children,
            name,
            data: NodeData::Namespace(data),
        }
    }

    /// Creates a comment node.
    #[inline]
    pub const fn comment(span: Span, style: CommentStyle) -> Self {
        Self {
            kind: NodeKind::Comment,
            span,
            children: &[],
            name: None,
            data: NodeData::Comment(style),
        }
    }

    /// Returns true if this node has children.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the namespace data if this is a namespace node.
    #[inline]
    pub fn as_namespace(&self) -> Option<&NamespaceData> {
        match &self.data {
            NodeData::Namespace(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the slice of `source` this node covers.
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.span.start as usize..self.span.end as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstArena;

    #[test]
    fn test_new_parent() {
        let arena = AstArena::new();
        let child = SyntaxNode::comment(Span::new(0, 5), CommentStyle::Line);
        let node = SyntaxNode::new_parent(
            NodeKind::Block,
            Span::new(0, 5),
            arena.alloc_children(vec![child]),
        );

        assert_eq!(node.kind, NodeKind::Block);
        assert!(node.has_children());
        assert!(node.as_namespace().is_none());
    }

    #[test]
    fn test_namespace_data() {
        let data = NamespaceData {
            keyword: Span::new(0, 9),
            name_span: Some(Span::new(10, 13)),
            rbrace: 20,
            is_inline: false,
        };
        let node = SyntaxNode::namespace(Span::new(0, 21), Some("foo"), data, &[]);

        assert_eq!(node.name, Some("foo"));
        assert_eq!(node.as_namespace().map(|d| d.rbrace), Some(20));
    }

    #[test]
    fn test_text() {
        let source = "// hi\nint x;";
        let node = SyntaxNode::comment(Span::new(0, 5), CommentStyle::Line);
        assert_eq!(node.text(source), Some("// hi"));
    }

    #[test]
    fn test_serialize_omits_children_of_leaves() {
        let node = SyntaxNode::comment(Span::new(0, 5), CommentStyle::Line);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"kind":"Comment","range":[0,5]}"#);
    }
}
