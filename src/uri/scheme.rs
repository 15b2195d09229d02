//! URI scheme.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The scheme of a [`Uri`](crate::Uri), e.g. `http`.
///
/// Compared case-sensitively, exactly as written in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scheme(Cow<'static, str>);

impl Scheme {
    // well-known schemes
    pub const HTTP: Scheme = Scheme(Cow::Borrowed("http"));
    pub const HTTPS: Scheme = Scheme(Cow::Borrowed("https"));
    pub const UNIX: Scheme = Scheme(Cow::Borrowed("unix"));
    pub const HTTP_UNIX: Scheme = Scheme(Cow::Borrowed("http_unix"));
    pub const HTTPS_UNIX: Scheme = Scheme(Cow::Borrowed("https_unix"));
    pub const WS: Scheme = Scheme(Cow::Borrowed("ws"));
    pub const WSS: Scheme = Scheme(Cow::Borrowed("wss"));

    /// Wrap an arbitrary scheme name. No normalisation is applied.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    /// The scheme text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scheme {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Scheme {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Scheme {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Scheme {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
