//! # ko-spans
//!
//! Locates KnockoutJS container-comment bindings in HTML documents so an
//! editor or language tool can highlight them.
//!
//! Knockout's "virtual elements" are comments that open and close a binding
//! scope without a wrapper element:
//!
//! ```html
//! <ul>
//!   <!-- ko foreach: items -->
//!   <li data-bind="text: $data"></li>
//!   <!-- /ko -->
//! </ul>
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ko_spans::{extract, Span, SpanIndex};
//!
//! let html = "<div><!-- ko foreach: items -->\n<span>x</span>\n<!-- /ko --></div>";
//!
//! // One-off scan
//! let spans = extract(html);
//! assert_eq!(&spans[..], &[Span::new(5, 26), Span::new(47, 12)]);
//!
//! // Repeated queries over the same text hit the cache
//! let index = SpanIndex::new();
//! assert_eq!(index.query(html, 0, 20), vec![Span::new(5, 26)]);
//! ```
//!
//! ## Features
//!
//! - **Position-exact scanning**: byte offsets and lengths refer to the
//!   caller's text, delimiters included
//! - **Tolerant**: any input, however malformed, yields a best-effort result
//! - **Cached**: span sets are memoized per document content with a
//!   time-to-live, and concurrent misses compute once
//! - **Host boundary**: a [`Classifier`] trait for editor integrations

mod error;
mod extract;
mod options;
mod patterns;
mod query;
mod span;

/// Tolerant, position-preserving HTML comment scanner.
pub mod html;

/// Result cache with per-entry time-to-live.
pub mod cache;

/// Highlighting boundary for editor hosts.
pub mod classifier;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use classifier::{ClassificationSpan, Classifier, KnockoutClassifier};
pub use error::{Error, Result};
pub use extract::{extract, knockout_comments, BindingKind, KnockoutComment};
pub use options::{Options, KNOCKOUT_CLASSIFICATION};
pub use query::{SpanIndex, SpanStore};
pub use span::{spans_in_range, KnockoutSpanSet, Span};

/// Extracts Knockout comment spans from raw HTML bytes.
///
/// The charset is detected from a byte-order mark or `<meta>` declaration
/// (UTF-8 otherwise) and the input is transcoded lossily. Span offsets refer
/// to the returned UTF-8 text, not to `html`.
///
/// # Example
///
/// ```rust
/// use ko_spans::{extract_bytes, Span};
///
/// let (text, spans) = extract_bytes(b"\xEF\xBB\xBF<!-- /ko -->");
/// assert_eq!(text, "<!-- /ko -->");
/// assert_eq!(&spans[..], &[Span::new(0, 12)]);
/// ```
#[must_use]
pub fn extract_bytes(html: &[u8]) -> (String, KnockoutSpanSet) {
    let text = encoding::transcode_to_utf8(html);
    let spans = extract(&text);
    (text, spans)
}
