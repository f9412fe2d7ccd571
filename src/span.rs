//! Span types and range filtering.
//!
//! Offsets are byte offsets into the UTF-8 document text.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, start + length)` over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first byte covered by the span.
    pub start: usize,

    /// Number of bytes covered.
    pub length: usize,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Exclusive end offset.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// True when `offset` lies in `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Text covered by this span, or `None` if it does not fit `text`.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end())
    }
}

/// The spans produced by one extraction, in ascending `start` order.
///
/// Shared as an `Arc` so cache hits hand out the same allocation.
pub type KnockoutSpanSet = Arc<[Span]>;

/// Keeps the spans whose `start` lies in `[range_start, range_end)`.
///
/// Spans are returned whole, not clipped to the window. An inverted or
/// out-of-bounds window simply yields nothing.
#[must_use]
pub fn spans_in_range(spans: &[Span], range_start: usize, range_end: usize) -> Vec<Span> {
    if range_start >= range_end {
        return Vec::new();
    }

    spans
        .iter()
        .filter(|span| span.start >= range_start && span.start < range_end)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<Span> {
        vec![Span::new(5, 10), Span::new(20, 6)]
    }

    #[test]
    fn test_range_keeps_spans_starting_inside_window() {
        assert_eq!(spans_in_range(&fixture(), 0, 15), vec![Span::new(5, 10)]);
    }

    #[test]
    fn test_range_start_is_inclusive() {
        assert_eq!(spans_in_range(&fixture(), 20, 30), vec![Span::new(20, 6)]);
    }

    #[test]
    fn test_range_excludes_span_starting_before_window() {
        assert!(spans_in_range(&fixture(), 21, 30).is_empty());
    }

    #[test]
    fn test_range_end_is_exclusive() {
        assert!(spans_in_range(&fixture(), 0, 5).is_empty());
        assert_eq!(spans_in_range(&fixture(), 0, 6), vec![Span::new(5, 10)]);
    }

    #[test]
    fn test_range_does_not_clip() {
        let hits = spans_in_range(&fixture(), 10, 21);
        assert_eq!(hits, vec![Span::new(20, 6)]);
        assert_eq!(hits[0].end(), 26);
    }

    #[test]
    fn test_inverted_and_out_of_bounds_windows_are_empty() {
        assert!(spans_in_range(&fixture(), 15, 0).is_empty());
        assert!(spans_in_range(&fixture(), 7, 7).is_empty());
        assert!(spans_in_range(&fixture(), 1_000, 2_000).is_empty());
    }

    #[test]
    fn test_span_slice() {
        let span = Span::new(2, 3);
        assert_eq!(span.slice("abcdefg"), Some("cde"));
        assert_eq!(Span::new(5, 10).slice("short"), None);
        assert!(span.contains(2));
        assert!(!span.contains(5));
    }
}
