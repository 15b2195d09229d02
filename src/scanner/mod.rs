//! Zero-copy UTF-8 scanner.
//!
//! A [`Scanner`] is a cursor over a shared [`Utf8Buf`] restricted to a range of
//! it. Reading operations hand back new scanners (views) over the consumed
//! span; those views share the buffer instead of copying bytes, so the only
//! allocation happens when a view is materialized into a `String`.
//!
//! Every operation that can fail is transactional: when it returns an error
//! the cursor is where it was before the call.

mod buffer;
mod error;
mod pattern;
pub mod utf8;

use std::fmt;
use std::ops::Range;

use bytes::Bytes;

pub use buffer::Utf8Buf;
pub use error::Error;
pub use pattern::Pattern;

use crate::percent;

/// How [`Scanner::take_until_with`] behaves at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UntilOptions {
    /// Fail with [`Error::Overflow`] when the pattern is never found. When
    /// `false` the remainder of the view is returned instead.
    pub fail_on_overflow: bool,
    /// Leave the cursor after the match instead of on it.
    pub skip_to_end: bool,
}

impl UntilOptions {
    /// Return the remainder when the pattern is missing.
    pub const fn remainder() -> Self {
        Self {
            fail_on_overflow: false,
            skip_to_end: false,
        }
    }

    /// Move the cursor past the match.
    pub const fn skip_to_end(mut self) -> Self {
        self.skip_to_end = true;
        self
    }
}

impl Default for UntilOptions {
    fn default() -> Self {
        Self {
            fail_on_overflow: true,
            skip_to_end: false,
        }
    }
}

/// Cursor over a range of a shared UTF-8 buffer.
#[derive(Clone)]
pub struct Scanner {
    buf: Utf8Buf,
    pos: usize,
    start: usize,
    end: usize,
}

impl Scanner {
    /// Create a scanner covering the whole buffer.
    pub fn new(buf: impl Into<Utf8Buf>) -> Self {
        let buf = buf.into();
        let end = buf.len();
        Self {
            buf,
            pos: 0,
            start: 0,
            end,
        }
    }

    /// Validate raw bytes and scan them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtf8`] if the bytes are not well-formed UTF-8.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self, Error> {
        Utf8Buf::new(bytes).map(Self::new)
    }

    /// View over `start..end` of the same buffer. Both ends are trusted to be
    /// codepoint boundaries inside `self`'s bounds.
    fn sub(&self, start: usize, end: usize) -> Scanner {
        debug_assert!(self.start <= start && start <= end && end <= self.end);
        Scanner {
            buf: self.buf.clone(),
            pos: start,
            start,
            end,
        }
    }

    /// Create a view over `range` (absolute buffer offsets) without copying.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if the range is not inside this scanner's bounds,
    /// [`Error::Unexpected`] if either end splits a codepoint.
    pub fn view(&self, range: Range<usize>) -> Result<Scanner, Error> {
        if range.start > range.end || range.start < self.start || range.end > self.end {
            return Err(Error::Overflow);
        }
        for at in [range.start, range.end] {
            if !self.buf.is_char_boundary(at) {
                return Err(Error::Unexpected(format!(
                    "offset {at} is inside a UTF-8 sequence"
                )));
            }
        }
        Ok(self.sub(range.start, range.end))
    }

    /// The whole shared buffer, not just this view.
    #[inline]
    pub fn buffer(&self) -> &Utf8Buf {
        &self.buf
    }

    /// Absolute offset of the cursor in the shared buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute range of the buffer this scanner covers.
    #[inline]
    pub fn bounds(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the view in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the view covers no bytes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of codepoints in the view.
    pub fn char_count(&self) -> usize {
        let mut count = 0;
        let mut at = self.start;
        while at < self.end {
            at = self.buf.skip_forward(at);
            count += 1;
        }
        count
    }

    /// Whether the cursor has reached the end of the view.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos == self.end
    }

    /// Codepoint at the cursor, or `'\0'` at the end of the view.
    pub fn peek(&self) -> char {
        if self.at_end() {
            return '\0';
        }
        self.buf.decode(self.pos).0
    }

    /// Decode the codepoint at the cursor and move past it.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] at the end of the view.
    pub fn next_char(&mut self) -> Result<char, Error> {
        if self.at_end() {
            return Err(Error::Overflow);
        }
        let (c, next) = self.buf.decode(self.pos);
        self.pos = next;
        Ok(c)
    }

    fn step_forward(&mut self) -> Result<(), Error> {
        if self.at_end() {
            return Err(Error::Overflow);
        }
        self.pos = self.buf.skip_forward(self.pos);
        Ok(())
    }

    fn step_backward(&mut self) -> Result<(), Error> {
        if self.pos == self.start {
            return Err(Error::Overflow);
        }
        self.pos = self.buf.skip_backward(self.pos);
        Ok(())
    }

    /// Move forward `count` codepoints.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if fewer than `count` codepoints remain.
    pub fn advance(&mut self, count: usize) -> Result<(), Error> {
        self.attempt(|s| (0..count).try_for_each(|_| s.step_forward()))
    }

    /// Move back `count` codepoints.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if that would cross the start of the view.
    pub fn retreat(&mut self, count: usize) -> Result<(), Error> {
        self.attempt(|s| (0..count).try_for_each(|_| s.step_backward()))
    }

    /// Put the cursor back at the start of the view.
    pub fn move_to_start(&mut self) {
        self.pos = self.start;
    }

    /// Move the cursor to the end of the view.
    pub fn move_to_end(&mut self) {
        self.pos = self.end;
    }

    /// Run `f`, putting the cursor back where it was if `f` fails.
    ///
    /// ```
    /// use microuri_rs::{Scanner, ScanError};
    ///
    /// let mut scanner = Scanner::new("key=value");
    /// let result = scanner.attempt(|s| {
    ///     s.take_until('=')?;
    ///     s.advance(1)?;
    ///     s.take_until(';')
    /// });
    /// assert_eq!(result.unwrap_err(), ScanError::Overflow);
    /// assert_eq!(scanner.position(), 0);
    /// ```
    pub fn attempt<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let saved = self.pos;
        let result = f(self);
        if result.is_err() {
            self.pos = saved;
        }
        result
    }

    /// Consume `pattern` if it is at the cursor.
    ///
    /// Returns `false`, leaving the cursor alone, on a mismatch.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyPattern`] for a zero-length literal.
    /// - [`Error::Overflow`] at the end of the view, or when fewer bytes remain
    ///   than the literal needs.
    pub fn eat<P: Pattern>(&mut self, mut pattern: P) -> Result<bool, Error> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        if self.at_end() {
            return Err(Error::Overflow);
        }
        if pattern.literal_len().is_some_and(|len| len > self.end - self.pos) {
            return Err(Error::Overflow);
        }
        match pattern.match_at(&self.buf, self.pos, self.end) {
            Some(next) => {
                self.pos = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Consume exactly `count` codepoints.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if fewer than `count` codepoints remain.
    pub fn take(&mut self, count: usize) -> Result<Scanner, Error> {
        let start = self.pos;
        self.advance(count)?;
        Ok(self.sub(start, self.pos))
    }

    /// Consume up to the first match of `pattern`, leaving the cursor on it.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if the pattern is not found, [`Error::EmptyPattern`]
    /// for a zero-length literal.
    pub fn take_until<P: Pattern>(&mut self, pattern: P) -> Result<Scanner, Error> {
        self.take_until_with(pattern, UntilOptions::default())
    }

    /// [`take_until`](Self::take_until) with explicit [`UntilOptions`].
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] if the pattern is not found and
    /// `options.fail_on_overflow` is set, [`Error::EmptyPattern`] for a
    /// zero-length literal.
    pub fn take_until_with<P: Pattern>(
        &mut self,
        mut pattern: P,
        options: UntilOptions,
    ) -> Result<Scanner, Error> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        let start = self.pos;
        let mut at = start;
        while at < self.end {
            if let Some(stop) = pattern.match_at(&self.buf, at, self.end) {
                self.pos = if options.skip_to_end { stop } else { at };
                return Ok(self.sub(start, at));
            }
            at = self.buf.skip_forward(at);
        }
        if options.fail_on_overflow {
            return Err(Error::Overflow);
        }
        self.pos = self.end;
        Ok(self.sub(start, self.end))
    }

    /// Consume while `pattern` keeps matching. Never fails.
    pub fn take_while<P: Pattern>(&mut self, mut pattern: P) -> Scanner {
        let start = self.pos;
        while self.pos < self.end {
            match pattern.match_at(&self.buf, self.pos, self.end) {
                Some(next) if next > self.pos => self.pos = next,
                _ => break,
            }
        }
        self.sub(start, self.pos)
    }

    /// Consume everything up to the end of the view.
    pub fn take_rest(&mut self) -> Scanner {
        let start = self.pos;
        self.pos = self.end;
        self.sub(start, self.end)
    }

    /// Split the rest of the view at each `separator`.
    ///
    /// Empty sections between separators are kept; a separator at the very end
    /// does not produce a trailing empty section.
    pub fn split(&mut self, separator: char) -> Vec<Scanner> {
        let mut sections = Vec::new();
        while !self.at_end() {
            match self.take_until(separator) {
                Ok(section) => {
                    sections.push(section);
                    self.pos = self.buf.skip_forward(self.pos);
                }
                Err(_) => sections.push(self.take_rest()),
            }
        }
        sections
    }

    /// Iterate over the codepoints from the cursor to the end of the view.
    pub fn chars(&self) -> Chars<'_> {
        Chars {
            buf: &self.buf,
            at: self.pos,
            end: self.end,
        }
    }

    /// Bytes of the whole view.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_bytes()[self.start..self.end]
    }

    /// Zero-copy handle to the bytes of the whole view.
    pub fn to_bytes(&self) -> Bytes {
        self.buf.slice(self.start, self.end)
    }

    /// Copy the whole view into a `String`.
    pub fn materialize(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Copy the unread part of the view into a `String`.
    pub fn remaining(&self) -> String {
        String::from_utf8_lossy(&self.buf.as_bytes()[self.pos..self.end]).into_owned()
    }

    /// Percent-decode the unread part of the view.
    pub fn percent_decode(&self) -> Option<String> {
        percent::decode(&self.buf.as_bytes()[self.pos..self.end])
    }
}

impl From<&str> for Scanner {
    fn from(value: &str) -> Self {
        Scanner::new(value)
    }
}

impl From<String> for Scanner {
    fn from(value: String) -> Self {
        Scanner::new(value)
    }
}

impl From<Utf8Buf> for Scanner {
    fn from(value: Utf8Buf) -> Self {
        Scanner::new(value)
    }
}

/// Views compare by the text they cover, not by position.
impl PartialEq for Scanner {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Scanner {}

impl PartialEq<str> for Scanner {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Scanner {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Display for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("text", &String::from_utf8_lossy(self.as_bytes()))
            .field("position", &self.pos)
            .field("bounds", &(self.start..self.end))
            .finish()
    }
}

/// Iterator over the codepoints of a [`Scanner`], see [`Scanner::chars`].
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    buf: &'a Utf8Buf,
    at: usize,
    end: usize,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.at >= self.end {
            return None;
        }
        let (c, next) = self.buf.decode(self.at);
        self.at = next;
        Some(c)
    }
}
