//! Tree queries registered by checks.

use std::fmt;

use lintel_ast::{NodeKind, SyntaxNode};

/// A structural pattern over the outline tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kind: NodeKind,
    name: Option<String>,
}

impl Query {
    /// Matches every node of `kind`.
    pub fn node(kind: NodeKind) -> Self {
        Self { kind, name: None }
    }

    /// Matches nodes of `kind` declaring exactly `name`.
    pub fn named(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
        }
    }

    /// Returns the node kind this query selects.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns true if `node` satisfies the query.
    pub fn matches(&self, node: &SyntaxNode<'_>) -> bool {
        node.kind == self.kind
            && self
                .name
                .as_deref()
                .is_none_or(|name| node.name == Some(name))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}(hasName(\"{}\"))", self.kind, name),
            None => write!(f, "{}()", self.kind),
        }
    }
}

/// Collects the queries one check registers.
#[derive(Debug, Clone, Default)]
pub struct MatchFinder {
    queries: Vec<Query>,
}

impl MatchFinder {
    /// Creates an empty finder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a query. Queries are tried in registration order.
    pub fn add_matcher(&mut self, query: Query) {
        self.queries.push(query);
    }

    /// Returns the registered queries.
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// Returns true if no query was registered.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Returns the registered queries `node` satisfies.
    pub fn matching<'q>(&'q self, node: &SyntaxNode<'_>) -> impl Iterator<Item = &'q Query> {
        let node = *node;
        self.queries.iter().filter(move |query| query.matches(&node))
    }
}

/// One structural match handed to a check.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'r, 'a> {
    /// The matched node.
    pub node: &'r SyntaxNode<'a>,
    /// Ancestors of the node, outermost first.
    pub ancestors: &'r [SyntaxNode<'a>],
    /// The query that matched.
    pub query: &'r Query,
}

impl<'r, 'a> MatchResult<'r, 'a> {
    /// Returns the immediate parent of the matched node.
    pub fn parent(&self) -> Option<&'r SyntaxNode<'a>> {
        self.ancestors.last()
    }

    /// Returns the node that follows the matched node among its siblings.
    pub fn next_sibling(&self) -> Option<&'r SyntaxNode<'a>> {
        let siblings = self.parent()?.children;
        let index = siblings
            .iter()
            .position(|sibling| sibling.span == self.node.span && sibling.kind == self.node.kind)?;
        siblings.get(index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_ast::{AstArena, CommentStyle, NamespaceData, Span};

    fn namespace<'a>(name: Option<&'a str>, span: Span) -> SyntaxNode<'a> {
        let data = NamespaceData {
            keyword: Span::new(span.start, span.start + 9),
            name_span: None,
            rbrace: span.end - 1,
            is_inline: false,
        };
        SyntaxNode::namespace(span, name, data, &[])
    }

    #[test]
    fn test_query_matching() {
        let node = namespace(Some("foo"), Span::new(0, 20));

        assert!(Query::node(NodeKind::Namespace).matches(&node));
        assert!(Query::named(NodeKind::Namespace, "foo").matches(&node));
        assert!(!Query::named(NodeKind::Namespace, "bar").matches(&node));
        assert!(!Query::node(NodeKind::Block).matches(&node));
    }

    #[test]
    fn test_query_display() {
        assert_eq!(Query::node(NodeKind::Namespace).to_string(), "namespaceDecl()");
        assert_eq!(
            Query::named(NodeKind::Comment, "x").to_string(),
            "comment(hasName(\"x\"))"
        );
    }

    #[test]
    fn test_finder_keeps_registration_order() {
        let mut finder = MatchFinder::new();
        assert!(finder.is_empty());
        finder.add_matcher(Query::named(NodeKind::Namespace, "foo"));
        finder.add_matcher(Query::node(NodeKind::Namespace));
        finder.add_matcher(Query::node(NodeKind::Comment));

        let node = namespace(Some("foo"), Span::new(0, 20));
        let matched: Vec<_> = finder.matching(&node).collect();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0], &finder.queries()[0]);
    }

    #[test]
    fn test_next_sibling() {
        let arena = AstArena::new();
        let ns = namespace(Some("a"), Span::new(0, 15));
        let comment = SyntaxNode::comment(Span::new(16, 30), CommentStyle::Line);
        let root = SyntaxNode::new_parent(
            NodeKind::TranslationUnit,
            Span::new(0, 30),
            arena.alloc_children(vec![ns, comment]),
        );
        let query = Query::node(NodeKind::Namespace);
        let ancestors = [root];
        let result = MatchResult {
            node: &root.children[0],
            ancestors: &ancestors,
            query: &query,
        };

        assert_eq!(result.next_sibling().map(|n| n.kind), Some(NodeKind::Comment));
        assert_eq!(result.parent().map(|n| n.kind), Some(NodeKind::TranslationUnit));
    }
}
