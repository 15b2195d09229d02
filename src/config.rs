//! Query string configuration.

/// How a query string is split into parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Separator between `key=value` pairs.
    pub separator: char,
    /// Percent-decode keys after splitting on `=`. Keys are kept as written
    /// by default; only values are decoded.
    pub decode_keys: bool,
    /// Read `+` as a space before percent-decoding (HTML form encoding).
    pub plus_as_space: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            separator: '&',
            decode_keys: false,
            plus_as_space: false,
        }
    }
}

impl QueryConfig {
    /// Configuration for `application/x-www-form-urlencoded` bodies and queries.
    ///
    /// Keys and values are both decoded, and `+` reads as a space.
    pub fn form() -> Self {
        Self {
            decode_keys: true,
            plus_as_space: true,
            ..Self::default()
        }
    }

    /// Decode `bytes` according to this configuration.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Option<String> {
        if self.plus_as_space {
            crate::percent::decode_form(bytes)
        } else {
            crate::percent::decode(bytes)
        }
    }
}
