//! # lintel_ast
//!
//! Outline syntax tree for lintel.
//!
//! Checks query this tree to find the constructs they care about. The tree
//! only models scope structure (namespaces, blocks), comments and
//! preprocessor directives; everything else is left to the source text.
//!
//! ## Architecture
//!
//! - Uses `bumpalo` for Arena allocation
//! - All nodes of one translation unit are allocated in a single arena
//! - Memory is freed all at once when the unit has been checked
//!
//! ## Example
//!
//! ```rust
//! use lintel_ast::{AstArena, NodeKind, Span, SyntaxNode};
//!
//! let arena = AstArena::new();
//! let node = arena.alloc(SyntaxNode::new_parent(
//!     NodeKind::TranslationUnit,
//!     Span::new(0, 100),
//!     &[],
//! ));
//! assert_eq!(node.kind, NodeKind::TranslationUnit);
//! ```

mod arena;
mod line_index;
mod node;
mod node_kind;
mod span;
pub mod visitor;

pub use arena::AstArena;
pub use line_index::LineIndex;
pub use node::{CommentStyle, NamespaceData, NodeData, SyntaxNode};
pub use node_kind::NodeKind;
pub use span::{Position, Span};

pub use visitor::{VisitResult, Visitor};
