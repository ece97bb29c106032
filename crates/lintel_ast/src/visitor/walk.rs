//! Walk functions for syntax tree traversal.

use std::ops::ControlFlow;

use crate::{NodeKind, SyntaxNode};

use super::visit::{VisitResult, Visitor};

/// Walks a node by dispatching to the appropriate kind-specific visitor method.
///
/// Calls `enter_node`, then the `visit_*` method for the node's kind, then
/// `exit_node`. Nodes are therefore entered in pre-order (source order).
pub fn walk_node<'a, V>(visitor: &mut V, node: &SyntaxNode<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    visitor.enter_node(node)?;

    match node.kind {
        NodeKind::TranslationUnit => visitor.visit_translation_unit(node),
        NodeKind::Namespace => visitor.visit_namespace(node),
        NodeKind::Block => visitor.visit_block(node),
        NodeKind::Comment => visitor.visit_comment(node),
        NodeKind::Directive => visitor.visit_directive(node),
    }?;

    visitor.exit_node(node)
}

/// Walks all children of a node, stopping early on `ControlFlow::Break`.
#[inline]
pub fn walk_children<'a, V>(visitor: &mut V, node: &SyntaxNode<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    for child in node.children {
        walk_node(visitor, child)?;
    }
    ControlFlow::Continue(())
}
