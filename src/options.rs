//! Configuration options for span indexing.
//!
//! The `Options` struct controls how long extraction results stay cached,
//! how many documents the cache may hold, and which classification type the
//! highlighting boundary reports.

use std::time::Duration;

use crate::cache::DEFAULT_TTL;

/// Classification type name reported for Knockout comment spans.
pub const KNOCKOUT_CLASSIFICATION: &str = "KnockoutJsCommentBindingClassifier";

/// Configuration options for a [`SpanIndex`](crate::SpanIndex).
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ko_spans::Options;
///
/// let options = Options {
///     cache_ttl: Duration::from_secs(60),
///     max_documents: Some(256),
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// How long a document's span set stays cached after it is computed.
    ///
    /// Default: 20 minutes
    pub cache_ttl: Duration,

    /// Upper bound on cached documents.
    ///
    /// `None` leaves the cache unbounded; entries then leave only through
    /// expiry or invalidation.
    ///
    /// Default: `None`
    pub max_documents: Option<u64>,

    /// Classification type attached to every span a classifier reports.
    ///
    /// Default: `"KnockoutJsCommentBindingClassifier"`
    pub classification_type: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            max_documents: None,
            classification_type: KNOCKOUT_CLASSIFICATION.to_string(),
        }
    }
}
