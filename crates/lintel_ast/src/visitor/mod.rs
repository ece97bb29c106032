//! Visitor pattern for syntax tree traversal.
//!
//! - [`Visitor`] - Read-only traversal trait
//! - [`walk_node`] - Dispatch function for kind-specific visitors
//! - [`walk_children`] - Traverse all children of a node
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use lintel_ast::{AstArena, NodeKind, Span, SyntaxNode};
//! use lintel_ast::visitor::{Visitor, VisitResult, walk_node};
//!
//! struct CommentCounter(usize);
//!
//! impl<'a> Visitor<'a> for CommentCounter {
//!     fn visit_comment(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
//!         self.0 += 1;
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let arena = AstArena::new();
//! let comment = SyntaxNode::leaf(NodeKind::Comment, Span::new(0, 4));
//! let root = SyntaxNode::new_parent(
//!     NodeKind::TranslationUnit,
//!     Span::new(0, 4),
//!     arena.alloc_children(vec![comment]),
//! );
//!
//! let mut counter = CommentCounter(0);
//! walk_node(&mut counter, &root);
//! assert_eq!(counter.0, 1);
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_children, walk_node};
