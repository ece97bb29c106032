//! Visitor trait for traversing syntax nodes.

use std::ops::ControlFlow;

use crate::SyntaxNode;

use super::walk::{walk_children, walk_node};

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue visiting children
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing a syntax tree without modification.
///
/// Each `visit_*` method has a default implementation that walks children,
/// so implementors only override the kinds they care about.
pub trait Visitor<'a>: Sized {
    /// Called before a node is dispatched.
    #[inline]
    fn enter_node(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node and all its children were visited.
    #[inline]
    fn exit_node(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visits any node by dispatching to the kind-specific method.
    #[inline]
    fn visit_node(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        walk_node(self, node)
    }

    fn visit_translation_unit(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_namespace(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_block(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_comment(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    fn visit_directive(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }
}
