//! Arena allocator for syntax nodes.
//!
//! Uses `bumpalo` so that every node of one translation unit lives in a
//! single allocation region that is released when the unit is done.

use bumpalo::Bump;

use crate::SyntaxNode;

/// Arena allocator for syntax nodes.
///
/// # Example
///
/// ```rust
/// use lintel_ast::AstArena;
///
/// let arena = AstArena::new();
///
/// let value = arena.alloc(42u32);
/// assert_eq!(*value, 42);
///
/// let s = arena.alloc_str("hello");
/// assert_eq!(s, "hello");
/// ```
pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    /// Creates a new arena allocator.
    #[inline]
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena with room for `capacity` bytes before it grows.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Allocates a value in the arena and returns a reference to it.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Allocates a string slice in the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Moves a list of finished child nodes into the arena.
    #[inline]
    pub fn alloc_children<'a>(&'a self, children: Vec<SyntaxNode<'a>>) -> &'a [SyntaxNode<'a>] {
        if children.is_empty() {
            return &[];
        }
        self.bump.alloc_slice_copy(&children)
    }

    /// Returns the total bytes allocated in this arena.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}
