//! Byte ranges in the source text.

use std::{fmt, ops::Range};

/// A half-open byte range `start..end` in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Create a span covering the character starting at `offset` in `source`.
    ///
    /// Offsets at the end of the text, or inside a multi-byte character, give
    /// an empty span at `offset`.
    pub fn at_char(source: &str, offset: usize) -> Self {
        let end = source
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(offset, |c| offset + c.len_utf8());
        Self::new(offset..end)
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_at_char() {
        let source = "a: é";
        assert_eq!(Span::at_char(source, 0), Span::new(0..1));
        assert_eq!(Span::at_char(source, 3), Span::new(3..5));
        assert!(Span::at_char(source, 4).is_empty());
        assert!(Span::at_char(source, 5).is_empty());
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(4..9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert_eq!(span.to_string(), "4..9");
    }
}
