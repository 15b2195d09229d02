//! Lenient URI parsing.
//!
//! A [`Uri`] is split once, at construction, into views over the input
//! buffer. Accessors only copy when they hand out a `String`.
//!
//! ```not_rust
//!   http://example.com:8080/a/b?x=1&y=2
//!   \__/   \_________/ \__/\__/ \_____/
//!    |          |        |   |     |
//! scheme      host     port path query
//! ```
//!
//! Parsing never fails. Anything the parser does not recognise is left unset,
//! so a bare path such as `/a/b` is a valid, scheme-less URI.

mod de;
mod error;
mod parser;
mod query;
mod scheme;
mod tests;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::QueryConfig;
use crate::multimap::OrderedMultiMap;
use crate::scanner::{Error as ScanError, Scanner, Utf8Buf};

pub use error::Error;
pub use scheme::Scheme;

/// A parsed URI reference.
#[derive(Clone)]
pub struct Uri {
    raw: Scanner,
    scheme: Option<Scanner>,
    host: Option<Scanner>,
    port: Option<Scanner>,
    path: Option<Scanner>,
    query: Option<Scanner>,
}

impl Uri {
    /// Parse `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - The URI text, or an already validated [`Utf8Buf`]
    ///
    /// # Returns
    ///
    /// The parsed URI. Parsing never fails; unrecognised parts are left unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use microuri_rs::{Scheme, Uri};
    ///
    /// let uri = Uri::new("http://example.com:8080/a/b?x=1&y=2");
    /// assert_eq!(uri.scheme(), Some(Scheme::HTTP));
    /// assert_eq!(uri.host().as_deref(), Some("example.com"));
    /// assert_eq!(uri.port(), Some(8080));
    /// assert_eq!(uri.path(), "/a/b");
    /// assert_eq!(uri.query_parameters().get("y").map(String::as_str), Some("2"));
    /// ```
    pub fn new(input: impl Into<Utf8Buf>) -> Self {
        let raw = Scanner::new(input);
        let parser::Components {
            scheme,
            host,
            port,
            path,
            query,
        } = parser::parse(raw.clone());
        Self {
            raw,
            scheme,
            host,
            port,
            path,
            query,
        }
    }

    /// Validate raw bytes as UTF-8 and parse them.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidUtf8`] if the bytes are not well-formed UTF-8.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self, ScanError> {
        Utf8Buf::new(bytes).map(Self::new)
    }

    /// The input, unchanged.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }

    /// Scheme, exactly as written before `://`.
    ///
    /// # Returns
    ///
    /// `None` when the input has no `://`
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme.as_ref().map(|s| Scheme::new(s.materialize()))
    }

    /// Host, between `://` and the first `:`, `/` or `?`.
    ///
    /// # Returns
    ///
    /// `None` when there is no scheme or the host is empty
    pub fn host(&self) -> Option<String> {
        self.host.as_ref().map(Scanner::materialize)
    }

    /// Port number, if present.
    ///
    /// The port is narrowed to a `u16`: text that is not a number in
    /// `0..=65535` (such as `99999` or an empty port) gives `None` rather than
    /// an out-of-range integer.
    pub fn port(&self) -> Option<u16> {
        self.port.as_ref()?.materialize().parse().ok()
    }

    /// Path, `/` when the input has none.
    pub fn path(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "/".to_string(), Scanner::materialize)
    }

    /// Raw query, without the leading `?`.
    pub fn query(&self) -> Option<String> {
        self.query.as_ref().map(Scanner::materialize)
    }

    /// Query parameters with the default [`QueryConfig`].
    pub fn query_parameters(&self) -> OrderedMultiMap<String, String> {
        self.query_parameters_with(&QueryConfig::default())
    }

    /// Query parameters split and decoded according to `config`.
    pub fn query_parameters_with(&self, config: &QueryConfig) -> OrderedMultiMap<String, String> {
        match &self.query {
            Some(query) => query::parameters(query, config),
            None => OrderedMultiMap::new(),
        }
    }

    /// Decode the query parameters into `T`.
    ///
    /// Scalar fields (`u32`, `bool`, `f64`, ...) are parsed from the value text.
    /// Sequence fields collect every value of a key, so `tag=a` reads as
    /// `vec!["a"]`. A scalar field with a repeated key takes the first value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryDecode`] if the parameters do not fit `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use microuri_rs::Uri;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Search {
    ///     q: String,
    ///     tag: Vec<String>,
    ///     page: u32,
    /// }
    ///
    /// let uri = Uri::new("/search?q=rust%20uri&tag=a&tag=b&page=2");
    /// let search: Search = uri.query_as().unwrap();
    /// assert_eq!(search.q, "rust uri");
    /// assert_eq!(search.tag, vec!["a", "b"]);
    /// assert_eq!(search.page, 2);
    /// ```
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(de::from_parameters(&self.query_parameters())?)
    }

    /// Zero-copy view of the scheme.
    #[inline]
    pub fn scheme_view(&self) -> Option<&Scanner> {
        self.scheme.as_ref()
    }

    /// Zero-copy view of the host.
    #[inline]
    pub fn host_view(&self) -> Option<&Scanner> {
        self.host.as_ref()
    }

    /// Zero-copy view of the port text, including ports [`port`](Self::port)
    /// can not represent.
    #[inline]
    pub fn port_view(&self) -> Option<&Scanner> {
        self.port.as_ref()
    }

    /// Zero-copy view of the path. `None` where [`path`](Self::path) falls
    /// back to `/`.
    #[inline]
    pub fn path_view(&self) -> Option<&Scanner> {
        self.path.as_ref()
    }

    /// Zero-copy view of the query, without the `?`.
    #[inline]
    pub fn query_view(&self) -> Option<&Scanner> {
        self.query.as_ref()
    }
}

impl From<&str> for Uri {
    fn from(value: &str) -> Self {
        Uri::new(value)
    }
}

impl From<String> for Uri {
    fn from(value: String) -> Self {
        Uri::new(value)
    }
}

impl FromStr for Uri {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Uri::new(s))
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Uri {}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uri")
            .field("scheme", &self.scheme())
            .field("host", &self.host())
            .field("port", &self.port())
            .field("path", &self.path())
            .field("query", &self.query())
            .finish()
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Uri::new)
    }
}
