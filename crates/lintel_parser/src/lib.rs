//! # lintel_parser
//!
//! Parser abstraction layer for lintel.
//!
//! This crate provides:
//! - A `Parser` trait for plugging in source parsers
//! - `CxxParser`, an outline parser for C-family sources
//!
//! ## Example
//!
//! ```rust
//! use lintel_ast::{AstArena, NodeKind};
//! use lintel_parser::{CxxParser, Parser};
//!
//! let arena = AstArena::new();
//! let root = CxxParser::new()
//!     .parse(&arena, "namespace a {\nint x;\n}\n")
//!     .unwrap();
//! assert_eq!(root.children[0].kind, NodeKind::Namespace);
//! ```

mod cxx;
mod error;
mod traits;

pub use cxx::CxxParser;
pub use error::ParseError;
pub use traits::Parser;
