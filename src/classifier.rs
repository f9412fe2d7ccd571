//! Highlighting boundary for editor hosts.
//!
//! Hosts ask a [`Classifier`] for the classified spans inside the range they
//! are about to repaint. How a classification is drawn stays with the host;
//! [`KNOCKOUT_FORMAT`] only describes the default look so a host can register
//! it.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheStore, DocumentKey, CLASSIFIER_TTL};
use crate::query::{SpanIndex, SpanStore};
use crate::span::{KnockoutSpanSet, Span};
use crate::Options;

/// A span tagged with the classification type it should be styled as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSpan {
    #[serde(flatten)]
    pub span: Span,

    pub classification: String,
}

/// Something that classifies ranges of a document for highlighting.
pub trait Classifier {
    /// Name of the classification type this classifier emits.
    fn classification_type(&self) -> &str;

    /// Classified spans starting inside `range` of `text`, in document order.
    fn classify(&self, text: &str, range: Range<usize>) -> Vec<ClassificationSpan>;
}

/// Classifies Knockout container comments.
///
/// # Example
///
/// ```rust
/// use ko_spans::{Classifier, KnockoutClassifier};
///
/// let classifier = KnockoutClassifier::new();
/// let html = "<!-- ko if: open --><p></p><!-- /ko -->";
/// let spans = classifier.classify(html, 0..html.len());
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].classification, "KnockoutJsCommentBindingClassifier");
/// ```
pub struct KnockoutClassifier<S = SpanStore> {
    index: SpanIndex<S>,
    classification_type: String,
}

impl KnockoutClassifier {
    /// Creates a classifier whose cache uses [`CLASSIFIER_TTL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&Options {
            cache_ttl: CLASSIFIER_TTL,
            ..Options::default()
        })
    }

    #[must_use]
    pub fn with_options(options: &Options) -> Self {
        Self::with_index(SpanIndex::with_options(options), options)
    }
}

impl Default for KnockoutClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> KnockoutClassifier<S>
where
    S: CacheStore<DocumentKey, KnockoutSpanSet>,
{
    /// Wraps an existing index; only `classification_type` is read from
    /// `options`.
    #[must_use]
    pub fn with_index(index: SpanIndex<S>, options: &Options) -> Self {
        Self {
            index,
            classification_type: options.classification_type.clone(),
        }
    }

    #[must_use]
    pub const fn index(&self) -> &SpanIndex<S> {
        &self.index
    }
}

impl<S> Classifier for KnockoutClassifier<S>
where
    S: CacheStore<DocumentKey, KnockoutSpanSet>,
{
    fn classification_type(&self) -> &str {
        &self.classification_type
    }

    fn classify(&self, text: &str, range: Range<usize>) -> Vec<ClassificationSpan> {
        self.index
            .query(text, range.start, range.end)
            .into_iter()
            .map(|span| ClassificationSpan {
                span,
                classification: self.classification_type.clone(),
            })
            .collect()
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Default appearance a host may register for a classification type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationFormat {
    pub name: &'static str,
    pub display_name: &'static str,
    pub foreground: Rgb,
    pub foreground_opacity: f64,
    /// Whether users may restyle it in the host's settings.
    pub user_visible: bool,
}

/// Lawn-green foreground for Knockout comment bindings.
pub const KNOCKOUT_FORMAT: ClassificationFormat = ClassificationFormat {
    name: crate::options::KNOCKOUT_CLASSIFICATION,
    display_name: "KnockoutJs Comment Bindings",
    foreground: Rgb(0x7C, 0xFC, 0x00),
    foreground_opacity: 1.0,
    user_visible: true,
};
