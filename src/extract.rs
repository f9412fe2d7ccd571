//! Span extraction.
//!
//! Scans a document for comment nodes and keeps the ones shaped like
//! Knockout container bindings. Pure and stateless: safe to call from any
//! number of threads.

use serde::{Deserialize, Serialize};

use crate::html::{self, CommentNode};
use crate::patterns::{KNOCKOUT_CLOSE, KNOCKOUT_OPEN};
use crate::span::{KnockoutSpanSet, Span};

/// Which side of a container binding a comment marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BindingKind {
    /// `<!-- ko name: expression -->`
    Open {
        /// Binding name, e.g. `foreach` or `if`.
        binding: String,
    },
    /// `<!-- /ko -->`
    Close,
}

/// A comment recognised as a Knockout container binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutComment {
    /// Source range of the whole comment, delimiters included.
    #[serde(flatten)]
    pub span: Span,

    #[serde(flatten)]
    pub kind: BindingKind,
}

/// Classifies a comment node, or `None` for ordinary comments.
fn classify(node: &CommentNode<'_>) -> Option<BindingKind> {
    if let Some(caps) = KNOCKOUT_OPEN.captures(node.comment) {
        let binding = caps.name("binding").map_or("", |m| m.as_str()).to_string();
        return Some(BindingKind::Open { binding });
    }
    if KNOCKOUT_CLOSE.is_match(node.comment) {
        return Some(BindingKind::Close);
    }
    None
}

#[inline]
fn is_knockout(node: &CommentNode<'_>) -> bool {
    KNOCKOUT_OPEN.is_match(node.comment) || KNOCKOUT_CLOSE.is_match(node.comment)
}

#[inline]
fn node_span(node: &CommentNode<'_>) -> Span {
    Span::new(node.position, node.outer_html.len())
}

/// Returns the spans of all Knockout container comments in `text`.
///
/// Spans are in document order and cover each comment including its
/// delimiters. Open and close markers are reported independently: nothing is
/// paired, balanced or deduplicated.
///
/// # Example
///
/// ```rust
/// use ko_spans::{extract, Span};
///
/// let spans = extract("<!-- ko if: ready --><p>hi</p><!-- /ko -->");
/// assert_eq!(&spans[..], &[Span::new(0, 21), Span::new(30, 12)]);
/// ```
#[must_use]
pub fn extract(text: &str) -> KnockoutSpanSet {
    html::comments(text)
        .iter()
        .filter(|node| is_knockout(node))
        .map(node_span)
        .collect()
}

/// Like [`extract`], but keeps the binding kind and name of each match.
#[must_use]
pub fn knockout_comments(text: &str) -> Vec<KnockoutComment> {
    html::comments(text)
        .iter()
        .filter_map(|node| {
            classify(node).map(|kind| KnockoutComment {
                span: node_span(node),
                kind,
            })
        })
        .collect()
}
