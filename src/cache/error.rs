use std::time::Duration;

use thiserror::Error;

/// Failures raised by a cache backend.
///
/// None of these ever abort a storefront read: `get` absorbs them into a
/// miss, and mutation paths log and continue, because the relational store
/// remains the source of truth either way.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache payload serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    /// One of the two entries in a `set`/`invalidate` failed while the
    /// other applied. The relational write has already succeeded, so
    /// callers log this rather than propagate it.
    #[error("partial cache write: {applied} of {attempted} entries applied")]
    Partial { attempted: usize, applied: usize },
}
