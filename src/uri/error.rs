//! Error types for URI helpers.
//!
//! Parsing itself never fails; these only come from typed decoding.

use thiserror::Error;

/// Errors returned by [`Uri::query_as`](crate::Uri::query_as).
#[derive(Debug, Error)]
pub enum Error {
    /// The query parameters do not fit the requested type.
    #[error("Query decoding error: {0}")]
    QueryDecode(#[from] serde::de::value::Error),
}
