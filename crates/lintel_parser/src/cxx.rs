//! Outline parser for C-family sources.
//!
//! This is not a C++ parser. It recognises just enough lexical structure
//! (comments, string and character literals, preprocessor lines, braces)
//! to produce a reliable tree of namespaces and brace blocks.

use lintel_ast::{AstArena, CommentStyle, NamespaceData, NodeKind, Span, SyntaxNode};

use crate::{ParseError, Parser};

const EXTENSIONS: &[&str] = &[
    "c", "cc", "cp", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "inl", "ipp",
];

/// Prefixes that turn a following `"` into a raw string literal.
const RAW_STRING_PREFIXES: &[&str] = &["R", "LR", "uR", "UR", "u8R"];

/// Outline parser for C and C++ sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct CxxParser;

impl CxxParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for CxxParser {
    fn name(&self) -> &str {
        "cxx"
    }

    fn extensions(&self) -> &[&str] {
        EXTENSIONS
    }

    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<SyntaxNode<'a>, ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::TooLarge(source.len()));
        }
        OutlineBuilder::new(arena, source).run()
    }
}

enum Scope {
    Namespace {
        start: u32,
        keyword: Span,
        name: Option<Span>,
        is_inline: bool,
    },
    Block {
        lbrace: u32,
    },
}

struct Frame<'a> {
    scope: Scope,
    lbrace: usize,
    children: Vec<SyntaxNode<'a>>,
}

struct OutlineBuilder<'a, 's> {
    arena: &'a AstArena,
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    root: Vec<SyntaxNode<'a>>,
    stack: Vec<Frame<'a>>,
    /// Span of the previous token when that token was a word.
    prev_word: Option<Span>,
    /// Only whitespace has been seen since the last newline.
    at_line_start: bool,
}

impl<'a, 's> OutlineBuilder<'a, 's> {
    fn new(arena: &'a AstArena, source: &'s str) -> Self {
        Self {
            arena,
            source,
            bytes: source.as_bytes(),
            pos: 0,
            root: Vec::new(),
            stack: Vec::new(),
            prev_word: None,
            at_line_start: true,
        }
    }

    fn run(mut self) -> Result<SyntaxNode<'a>, ParseError> {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\n' => {
                    self.pos += 1;
                    self.at_line_start = true;
                    continue;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => {
                    self.pos += 1;
                    continue;
                }
                b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.block_comment()?,
                b'#' if self.at_line_start => self.directive(),
                b'"' | b'\'' => {
                    self.quoted(b);
                    self.prev_word = None;
                }
                b'{' => {
                    self.stack.push(Frame {
                        scope: Scope::Block {
                            lbrace: self.pos as u32,
                        },
                        lbrace: self.pos,
                        children: Vec::new(),
                    });
                    self.pos += 1;
                    self.prev_word = None;
                }
                b'}' => {
                    self.close()?;
                    self.prev_word = None;
                }
                b if b.is_ascii_digit() => {
                    self.number();
                    self.prev_word = None;
                }
                b if is_ident_start(b) => self.word()?,
                _ => {
                    self.pos += 1;
                    self.prev_word = None;
                }
            }
            self.at_line_start = false;
        }

        if let Some(frame) = self.stack.last() {
            return Err(ParseError::unbalanced('{', frame.lbrace));
        }

        let children = self.arena.alloc_children(self.root);
        Ok(SyntaxNode::new_parent(
            NodeKind::TranslationUnit,
            Span::new(0, self.bytes.len() as u32),
            children,
        ))
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, node: SyntaxNode<'a>) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.root.push(node),
        }
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let mut end = self.bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |i| start + i);
        self.pos = end;
        if end > start && self.bytes[end - 1] == b'\r' {
            end -= 1;
        }
        self.push(SyntaxNode::comment(
            Span::new(start as u32, end as u32),
            CommentStyle::Line,
        ));
    }

    fn block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let end = find(&self.bytes[start + 2..], b"*/")
            .map(|i| start + 2 + i + 2)
            .ok_or_else(|| ParseError::invalid_source_at("unterminated block comment", start))?;
        self.pos = end;
        self.push(SyntaxNode::comment(
            Span::new(start as u32, end as u32),
            CommentStyle::Block,
        ));
        Ok(())
    }

    fn directive(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.bytes.len() && self.bytes[end] != b'\n' {
            end += 1;
            // A backslash right before the newline continues the directive.
            if end < self.bytes.len()
                && self.bytes[end] == b'\n'
                && ends_with_continuation(&self.bytes[start..end])
            {
                end += 1;
            }
        }
        self.pos = end;
        let mut trimmed = end;
        if trimmed > start && self.bytes[trimmed - 1] == b'\r' {
            trimmed -= 1;
        }
        self.push(SyntaxNode::leaf(
            NodeKind::Directive,
            Span::new(start as u32, trimmed as u32),
        ));
        self.prev_word = None;
    }

    /// Skips a string or character literal. Unterminated literals end at the
    /// newline, the way compilers recover from them.
    fn quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return,
                b if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn raw_string(&mut self, start: usize) -> Result<(), ParseError> {
        let open = self.pos;
        let paren = self.bytes[open..]
            .iter()
            .position(|&b| b == b'(')
            .map(|i| open + i)
            .ok_or_else(|| ParseError::invalid_source_at("malformed raw string literal", start))?;
        let mut terminator = Vec::with_capacity(paren - open + 1);
        terminator.push(b')');
        terminator.extend_from_slice(&self.bytes[open + 1..paren]);
        terminator.push(b'"');

        let end = find(&self.bytes[paren + 1..], &terminator)
            .map(|i| paren + 1 + i + terminator.len())
            .ok_or_else(|| {
                ParseError::invalid_source_at("unterminated raw string literal", start)
            })?;
        self.pos = end;
        Ok(())
    }

    /// Skips a numeric literal, including C++14 digit separators (`1'000`).
    fn number(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'\'' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn word(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos = ident_end(self.bytes, start);
        let text = &self.source[start..self.pos];

        if self.peek(0) == Some(b'"') && RAW_STRING_PREFIXES.contains(&text) {
            self.raw_string(start)?;
            self.prev_word = None;
            return Ok(());
        }

        if text == "namespace" && !self.prev_word_is("using") {
            let keyword = Span::new(start as u32, self.pos as u32);
            if let Some((name, lbrace)) = self.namespace_head(self.pos) {
                let is_inline = self.prev_word_is("inline");
                let start = match self.prev_word {
                    Some(prev) if is_inline => prev.start,
                    _ => keyword.start,
                };
                self.stack.push(Frame {
                    scope: Scope::Namespace {
                        start,
                        keyword,
                        name,
                        is_inline,
                    },
                    lbrace,
                    children: Vec::new(),
                });
                self.pos = lbrace + 1;
                self.prev_word = None;
                return Ok(());
            }
        }

        self.prev_word = Some(Span::new(start as u32, self.pos as u32));
        Ok(())
    }

    fn prev_word_is(&self, word: &str) -> bool {
        self.prev_word
            .and_then(|span| self.source.get(span.start as usize..span.end as usize))
            == Some(word)
    }

    /// Looks ahead from the end of a `namespace` keyword for an optional
    /// (possibly qualified) name followed by `{`.
    ///
    /// Returns the name span and the brace offset, or `None` when this is not
    /// a namespace definition (an alias, `using namespace`, or garbage).
    fn namespace_head(&self, from: usize) -> Option<(Option<Span>, usize)> {
        let mut p = self.skip_attributes(skip_trivia(self.bytes, from));
        let mut name: Option<Span> = None;

        while p < self.bytes.len() && is_ident_start(self.bytes[p]) {
            let end = ident_end(self.bytes, p);
            name = Some(match name {
                Some(span) => Span::new(span.start, end as u32),
                None => Span::new(p as u32, end as u32),
            });
            let after = skip_trivia(self.bytes, end);
            if self.bytes[after..].starts_with(b"::") {
                p = skip_trivia(self.bytes, after + 2);
            } else {
                p = after;
                break;
            }
        }

        p = self.skip_attributes(skip_trivia(self.bytes, p));
        (self.bytes.get(p) == Some(&b'{')).then_some((name, p))
    }

    fn skip_attributes(&self, mut p: usize) -> usize {
        while self.bytes[p..].starts_with(b"[[") {
            match find(&self.bytes[p + 2..], b"]]") {
                Some(i) => p = skip_trivia(self.bytes, p + 2 + i + 2),
                None => return p,
            }
        }
        p
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let rbrace = self.pos;
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| ParseError::unbalanced('}', rbrace))?;
        let children = self.arena.alloc_children(frame.children);

        let node = match frame.scope {
            Scope::Namespace {
                start,
                keyword,
                name,
                is_inline,
            } => {
                let display = name
                    .and_then(|span| self.source.get(span.start as usize..span.end as usize))
                    .map(|text| {
                        let compact: String = text.split_whitespace().collect();
                        self.arena.alloc_str(&compact)
                    });
                SyntaxNode::namespace(
                    Span::new(start, rbrace as u32 + 1),
                    display,
                    NamespaceData {
                        keyword,
                        name_span: name,
                        rbrace: rbrace as u32,
                        is_inline,
                    },
                    children,
                )
            }
            Scope::Block { lbrace } => SyntaxNode::new_parent(
                NodeKind::Block,
                Span::new(lbrace, rbrace as u32 + 1),
                children,
            ),
        };

        self.push(node);
        self.pos = rbrace + 1;
        Ok(())
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn ident_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b == b'_' || b == b'$'))
        .map_or(bytes.len(), |i| start + i)
}

/// Skips whitespace and comments starting at `p`.
fn skip_trivia(bytes: &[u8], mut p: usize) -> usize {
    loop {
        while p < bytes.len() && bytes[p].is_ascii_whitespace() {
            p += 1;
        }
        if bytes[p..].starts_with(b"//") {
            p = bytes[p..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |i| p + i);
        } else if bytes[p..].starts_with(b"/*") {
            match find(&bytes[p + 2..], b"*/") {
                Some(i) => p = p + 2 + i + 2,
                None => return bytes.len(),
            }
        } else {
            return p;
        }
    }
}

fn ends_with_continuation(line: &[u8]) -> bool {
    let trimmed = line.strip_suffix(b"\r").unwrap_or(line);
    trimmed.ends_with(b"\\")
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
