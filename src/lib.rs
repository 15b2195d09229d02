//! A zero-copy UTF-8 scanner and a minimal URI parser.
//!
//! This library provides a byte scanner that walks shared UTF-8 buffers without
//! copying, and a lenient URI parser built on top of it.
//!
//! # Features
//!
//! - Validate and decode UTF-8 by hand, one codepoint at a time
//! - Scan with literals, character sets and predicates, with backtracking on failure
//! - Cheap sub-scanners (views) that share one reference counted buffer
//! - Split URIs into scheme, host, port, path and query without ever failing
//! - Percent-decode query values, optionally keeping selected escapes
//! - Query parameters in an insertion-ordered map that keeps duplicate keys
//! - Serde support for URIs and query parameters
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use microuri_rs::Uri;
//!
//! let uri = Uri::new("https://example.com:8443/docs?page=2&lang=en");
//!
//! assert_eq!(uri.scheme().unwrap().as_str(), "https");
//! assert_eq!(uri.host().as_deref(), Some("example.com"));
//! assert_eq!(uri.port(), Some(8443));
//! assert_eq!(uri.path(), "/docs");
//!
//! let params = uri.query_parameters();
//! assert_eq!(params.get("page").map(String::as_str), Some("2"));
//! ```
//!
//! ## Scanning
//!
//! ```
//! use microuri_rs::{Scanner, ScanError};
//!
//! let mut scanner = Scanner::new("name=José;age=42");
//!
//! let key = scanner.take_until('=').unwrap();
//! assert_eq!(key, "name");
//! assert!(scanner.eat('=').unwrap());
//!
//! let value = scanner.take_until(';').unwrap();
//! assert_eq!(value.materialize(), "José");
//!
//! // a failed read leaves the cursor where it was
//! let before = scanner.position();
//! assert_eq!(scanner.take_until('#').unwrap_err(), ScanError::Overflow);
//! assert_eq!(scanner.position(), before);
//! ```
//!
//! See the `demos` directory for a runnable example.

pub mod config;
pub mod multimap;
pub mod percent;
pub mod scanner;
pub mod uri;

// Re-export commonly used items for convenience
pub use config::QueryConfig;
pub use multimap::OrderedMultiMap;
pub use scanner::{Error as ScanError, Pattern, Scanner, UntilOptions, Utf8Buf};
pub use uri::{Error as UriError, Scheme, Uri};
