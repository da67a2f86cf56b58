//! Byte-offset spans into source text.
//!
//! Every citation the tokenizer emits carries the span of the marker region
//! in the body text. Spans are `Ord` so span-keyed maps and sets iterate in
//! document order, which keeps matching and reporting deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Slice the source text this span was produced from.
    ///
    /// Returns `None` when the span does not fall on char boundaries of
    /// `source` (e.g. the span belongs to a different string).
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl From<ByteRange<usize>> for Span {
    fn from(range: ByteRange<usize>) -> Self {
        Self::new(range.start, range.end)
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
    fn test_slice_matches_offsets() {
        let text = "before (Smith, 2020) after";
        let span = Span::new(7, 20);
        assert_eq!(span.slice(text), Some("(Smith, 2020)"));
    }

    #[test]
    fn test_spans_order_by_document_position() {
        let a = Span::new(3, 9);
        let b = Span::new(12, 14);
        assert!(a < b);
    }
}
