//! Things a [`Scanner`](crate::Scanner) can look for.

use crate::scanner::buffer::Utf8Buf;

/// A literal, set or predicate matched at a codepoint boundary.
///
/// Implemented for:
/// - `char`: one codepoint,
/// - `&str`: a sequence of codepoints,
/// - `&[u8]` / `&[u8; N]`: a raw byte sequence that must end on a codepoint boundary,
/// - `&[char]` / `[char; N]`: any codepoint in the set,
/// - `FnMut(char) -> bool`: any codepoint accepted by the closure.
pub trait Pattern {
    /// If the pattern matches at `at`, return the offset just past the match.
    ///
    /// `at` is a codepoint boundary strictly below `end`, and the match must not
    /// extend beyond `end`.
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, end: usize) -> Option<usize>;

    /// Whether the pattern is a zero-length literal.
    fn is_empty(&self) -> bool {
        false
    }

    /// Byte length of a literal, or `None` for single-codepoint patterns.
    fn literal_len(&self) -> Option<usize> {
        None
    }
}

fn match_literal(lit: &[u8], buf: &Utf8Buf, at: usize, end: usize) -> Option<usize> {
    let stop = at.checked_add(lit.len())?;
    if stop > end || &buf.as_bytes()[at..stop] != lit {
        return None;
    }
    Some(stop)
}

impl Pattern for char {
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, _end: usize) -> Option<usize> {
        let (c, next) = buf.decode(at);
        (c == *self).then_some(next)
    }
}

impl Pattern for &str {
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, end: usize) -> Option<usize> {
        match_literal(self.as_bytes(), buf, at, end)
    }

    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }

    fn literal_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Pattern for &[u8] {
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, end: usize) -> Option<usize> {
        match_literal(self, buf, at, end).filter(|&stop| buf.is_char_boundary(stop))
    }

    fn is_empty(&self) -> bool {
        <[u8]>::is_empty(self)
    }

    fn literal_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<const N: usize> Pattern for &[u8; N] {
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, end: usize) -> Option<usize> {
        let mut bytes: &[u8] = self.as_slice();
        bytes.match_at(buf, at, end)
    }

    fn is_empty(&self) -> bool {
        N == 0
    }

    fn literal_len(&self) -> Option<usize> {
        Some(N)
    }
}

impl Pattern for &[char] {
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, _end: usize) -> Option<usize> {
        let (c, next) = buf.decode(at);
        self.contains(&c).then_some(next)
    }
}

impl<const N: usize> Pattern for [char; N] {
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, _end: usize) -> Option<usize> {
        let (c, next) = buf.decode(at);
        self.contains(&c).then_some(next)
    }
}

impl<F> Pattern for F
where
    F: FnMut(char) -> bool,
{
    fn match_at(&mut self, buf: &Utf8Buf, at: usize, _end: usize) -> Option<usize> {
        let (c, next) = buf.decode(at);
        self(c).then_some(next)
    }
}
