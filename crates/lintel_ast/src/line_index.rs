//! Offset to line/column conversion.

use crate::{Position, Span};

/// Pre-computed line starts of a source text.
///
/// Built once per file; lookups are a binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first byte of every line.
    line_starts: Vec<u32>,
    /// Total length of the source in bytes.
    len: u32,
}

impl LineIndex {
    /// Indexes `source`.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    /// Returns the number of lines (a trailing newline starts an empty line).
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Returns the 1-indexed line containing `offset`.
    ///
    /// Offsets past the end map to the last line.
    pub fn line(&self, offset: u32) -> u32 {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index as u32 + 1,
            Err(index) => index as u32,
        }
    }

    /// Returns the 1-indexed line/column position of `offset`.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = self.line(offset);
        let start = self.line_starts[(line - 1) as usize];
        Position::new(line, offset - start + 1)
    }

    /// Returns the byte span of a 1-indexed line, excluding its line terminator.
    pub fn line_span(&self, line: u32, source: &str) -> Option<Span> {
        let index = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(index)?;
        let mut end = self
            .line_starts
            .get(index + 1)
            .map_or(self.len, |next| next - 1);
        if end > start && source.as_bytes().get(end as usize - 1) == Some(&b'\r') {
            end -= 1;
        }
        Some(Span::new(start, end))
    }

    /// Returns the text of a 1-indexed line, excluding its line terminator.
    pub fn line_text<'s>(&self, line: u32, source: &'s str) -> Option<&'s str> {
        let span = self.line_span(line, source)?;
        source.get(span.start as usize..span.end as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SOURCE: &str = "namespace a {\nint x;\n}\n";

    #[rstest]
    #[case(0, Position::new(1, 1))]
    #[case(10, Position::new(1, 11))]
    #[case(14, Position::new(2, 1))]
    #[case(21, Position::new(3, 1))]
    #[case(23, Position::new(4, 1))]
    #[case(500, Position::new(4, 1))]
    fn test_position(#[case] offset: u32, #[case] expected: Position) {
        assert_eq!(LineIndex::new(SOURCE).position(offset), expected);
    }

    #[test]
    fn test_line_text() {
        let index = LineIndex::new(SOURCE);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_text(1, SOURCE), Some("namespace a {"));
        assert_eq!(index.line_text(3, SOURCE), Some("}"));
        assert_eq!(index.line_text(4, SOURCE), Some(""));
        assert_eq!(index.line_text(5, SOURCE), None);
    }

    #[test]
    fn test_crlf_is_stripped() {
        let source = "a\r\nb";
        let index = LineIndex::new(source);
        assert_eq!(index.line_text(1, source), Some("a"));
        assert_eq!(index.line_text(2, source), Some("b"));
    }
}
