//! Cached span queries.
//!
//! [`SpanIndex`] answers "which Knockout comments start in this window?" for
//! a document. The full-document span set is computed once per distinct text
//! and kept in a [`ResultCache`]; each query then filters it down to the
//! requested window.

use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheStore, DocumentKey, MemoryStore, ResultCache};
use crate::extract::extract;
use crate::span::{spans_in_range, KnockoutSpanSet, Span};
use crate::Options;

/// Default store type for document span sets.
pub type SpanStore = MemoryStore<DocumentKey, KnockoutSpanSet>;

/// Span lookups backed by a content-keyed result cache.
///
/// # Example
///
/// ```rust
/// use ko_spans::{SpanIndex, Span};
///
/// let index = SpanIndex::new();
/// let html = "<ul><!-- ko foreach: rows --><li></li><!-- /ko --></ul>";
/// assert_eq!(index.query(html, 0, 10), vec![Span::new(4, 25)]);
/// assert_eq!(index.query(html, 10, html.len()), vec![Span::new(38, 12)]);
/// ```
pub struct SpanIndex<S = SpanStore> {
    cache: ResultCache<DocumentKey, KnockoutSpanSet, S>,
    ttl: Duration,
}

impl SpanIndex {
    /// Creates an index with default [`Options`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&Options::default())
    }

    /// Creates an index with an in-memory store sized and timed by `options`.
    #[must_use]
    pub fn with_options(options: &Options) -> Self {
        Self::with_store(MemoryStore::new(options.max_documents), options)
    }
}

impl Default for SpanIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SpanIndex<S>
where
    S: CacheStore<DocumentKey, KnockoutSpanSet>,
{
    /// Creates an index over a caller-supplied store.
    #[must_use]
    pub fn with_store(store: S, options: &Options) -> Self {
        Self {
            cache: ResultCache::with_store(store),
            ttl: options.cache_ttl,
        }
    }

    /// Returns every Knockout comment span in `text`.
    ///
    /// Served from the cache when `text` was seen within the ttl. If the
    /// store is unavailable the spans are extracted directly.
    pub fn spans(&self, text: &str) -> KnockoutSpanSet {
        let key = DocumentKey::from_text(text);
        let mut computed = false;

        let cached = self.cache.get_or_compute(
            key,
            || {
                computed = true;
                extract(text)
            },
            self.ttl,
        );

        match cached {
            Ok(spans) => {
                debug!(%key, hit = !computed, spans = spans.len(), "resolved knockout spans");
                spans
            }
            Err(err) => {
                warn!(%key, error = %err, "span cache unavailable, extracting directly");
                extract(text)
            }
        }
    }

    /// Returns the spans whose start lies in `[start, end)`, unclipped.
    ///
    /// Windows outside the document, or with `start >= end`, yield nothing.
    pub fn query(&self, text: &str, start: usize, end: usize) -> Vec<Span> {
        spans_in_range(&self.spans(text), start, end)
    }

    /// Drops the cached span set for `text`, if any.
    pub fn invalidate(&self, text: &str) {
        let key = DocumentKey::from_text(text);
        if let Err(err) = self.cache.invalidate(&key) {
            warn!(%key, error = %err, "failed to invalidate cached spans");
        }
    }

    /// Drops every cached span set.
    pub fn clear(&self) {
        if let Err(err) = self.cache.invalidate_all() {
            warn!(error = %err, "failed to clear span cache");
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &ResultCache<DocumentKey, KnockoutSpanSet, S> {
        &self.cache
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<div><!-- ko foreach: items -->\n<span>x</span>\n<!-- /ko --></div>";

    #[test]
    fn test_query_whole_document() {
        let index = SpanIndex::new();
        assert_eq!(
            index.query(DOC, 0, DOC.len()),
            vec![Span::new(5, 26), Span::new(47, 12)]
        );
    }

    #[test]
    fn test_query_partial_windows() {
        let index = SpanIndex::new();
        assert_eq!(index.query(DOC, 0, 6), vec![Span::new(5, 26)]);
        assert_eq!(index.query(DOC, 6, 47), Vec::<Span>::new());
        assert_eq!(index.query(DOC, 47, 48), vec![Span::new(47, 12)]);
        assert!(index.query(DOC, 500, 600).is_empty());
    }

    #[test]
    fn test_spans_are_cached_by_content() {
        let index = SpanIndex::new();
        let first = index.spans(DOC);
        let second = index.spans(&DOC.to_string());
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(index.cache().entry_count(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let index = SpanIndex::new();
        let _ = index.spans(DOC);
        let _ = index.spans("<!-- /ko -->");
        assert_eq!(index.cache().entry_count(), 2);

        index.invalidate(DOC);
        assert!(index
            .cache()
            .get(&DocumentKey::from_text(DOC))
            .ok()
            .flatten()
            .is_none());

        index.clear();
        assert!(index
            .cache()
            .get(&DocumentKey::from_text("<!-- /ko -->"))
            .ok()
            .flatten()
            .is_none());
    }

    #[test]
    fn test_options_set_ttl() {
        let index = SpanIndex::with_options(&Options {
            cache_ttl: Duration::from_secs(5),
            ..Options::default()
        });
        assert_eq!(index.ttl(), Duration::from_secs(5));
    }
}
