//! Shared, validated byte buffer.

use std::fmt;

use bytes::Bytes;

use crate::scanner::error::Error;
use crate::scanner::utf8;

/// An immutable, reference counted buffer of well-formed UTF-8.
///
/// Cloning is cheap: every clone points at the same allocation. Any [`Scanner`]
/// built from the buffer, and every view spawned from that scanner, shares it.
///
/// [`Scanner`]: crate::Scanner
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Utf8Buf {
    bytes: Bytes,
}

impl Utf8Buf {
    /// Validate `bytes` and wrap them without copying.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtf8`] with the offset of the first bad byte.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, Error> {
        let bytes = bytes.into();
        match utf8::first_invalid(&bytes) {
            None => Ok(Self { bytes }),
            Some(offset) => Err(Error::InvalidUtf8 { offset }),
        }
    }

    /// Wrap a static string without copying.
    pub const fn from_static(string: &'static str) -> Self {
        Self {
            bytes: Bytes::from_static(string.as_bytes()),
        }
    }

    /// The validated bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Zero-copy handle to `bytes[start..end]`.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Bytes {
        self.bytes.slice(start..end)
    }

    /// Whether `at` starts a codepoint (or is the end of the buffer).
    #[inline]
    pub fn is_char_boundary(&self, at: usize) -> bool {
        at == self.bytes.len() || (at < self.bytes.len() && !utf8::is_continuation(self.bytes[at]))
    }

    /// Decode the codepoint at `at`, returning it with the offset that follows it.
    ///
    /// Scalars that are not valid `char`s (surrogates, values above U+10FFFF)
    /// decode as U+FFFD.
    #[inline]
    pub(crate) fn decode(&self, at: usize) -> (char, usize) {
        let (value, next) = utf8::decode(&self.bytes, at);
        (char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER), next)
    }

    #[inline]
    pub(crate) fn skip_forward(&self, at: usize) -> usize {
        utf8::skip_forward(&self.bytes, at)
    }

    #[inline]
    pub(crate) fn skip_backward(&self, at: usize) -> usize {
        utf8::skip_backward(&self.bytes, at)
    }
}

impl From<String> for Utf8Buf {
    fn from(value: String) -> Self {
        Self {
            bytes: Bytes::from(value),
        }
    }
}

impl From<&str> for Utf8Buf {
    fn from(value: &str) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(value.as_bytes()),
        }
    }
}

impl TryFrom<Vec<u8>> for Utf8Buf {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Bytes> for Utf8Buf {
    type Error = Error;

    fn try_from(value: Bytes) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Debug for Utf8Buf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.bytes))
    }
}
