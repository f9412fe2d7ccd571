//! Error types for ko-spans.
//!
//! Extraction and range queries never fail. Errors come only from cache
//! stores and from I/O in the command-line front end.

/// Error type for cache and I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing cache store could not serve the request.
    ///
    /// Query paths treat this as a soft failure and fall back to uncached
    /// extraction.
    #[error("Cache store unavailable: {0}")]
    CacheUnavailable(String),

    /// Reading the input document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
