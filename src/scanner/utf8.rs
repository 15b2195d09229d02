//! UTF-8 codec.
//!
//! `decode`, `skip_forward` and `skip_backward` trust their input: they only
//! look at leader bytes and never re-check continuation markers. Only call them
//! on bytes that passed [`validate`]; outside the crate they are reached
//! through [`Utf8Buf`](super::Utf8Buf).

/// Returns `true` if `byte` matches `10xxxxxx`.
#[inline]
pub(crate) const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Number of bytes in the sequence introduced by `leader`, or `None` if the
/// byte can not start a sequence.
#[inline]
const fn sequence_len(leader: u8) -> Option<usize> {
    if leader & 0x80 == 0 {
        Some(1)
    } else if leader & 0xE0 == 0xC0 {
        Some(2)
    } else if leader & 0xF0 == 0xE0 {
        Some(3)
    } else if leader & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// Decode the codepoint starting at `at`.
///
/// Returns the scalar value and the offset of the next codepoint.
pub(crate) fn decode(bytes: &[u8], at: usize) -> (u32, usize) {
    let b0 = bytes[at] as u32;
    if b0 & 0x80 == 0 {
        return (b0, at + 1);
    }

    let b1 = (bytes[at + 1] & 0x3F) as u32;
    if b0 & 0xE0 == 0xC0 {
        return (((b0 & 0x1F) << 6) | b1, at + 2);
    }

    let b2 = (bytes[at + 2] & 0x3F) as u32;
    if b0 & 0xF0 == 0xE0 {
        return (((b0 & 0x0F) << 12) | (b1 << 6) | b2, at + 3);
    }

    let b3 = (bytes[at + 3] & 0x3F) as u32;
    (
        ((b0 & 0x07) << 18) | (b1 << 12) | (b2 << 6) | b3,
        at + 4,
    )
}

/// Offset of the codepoint following the one at `at`.
#[inline]
pub(crate) fn skip_forward(bytes: &[u8], at: usize) -> usize {
    at + sequence_len(bytes[at]).unwrap_or(1)
}

/// Offset of the codepoint preceding `at`.
pub(crate) fn skip_backward(bytes: &[u8], at: usize) -> usize {
    let mut back = at - 1;
    // a leader is at most 3 bytes behind its last continuation byte
    while back > 0 && at - back < 4 && is_continuation(bytes[back]) {
        back -= 1;
    }
    back
}

/// Check that `bytes` is structurally well-formed UTF-8.
///
/// Every leader byte must be one of the four standard forms and be followed by
/// the right number of continuation bytes. Overlong encodings and surrogates
/// are accepted.
pub fn validate(bytes: &[u8]) -> bool {
    first_invalid(bytes).is_none()
}

/// Offset of the first byte that breaks the UTF-8 layout, if any.
pub(crate) fn first_invalid(bytes: &[u8]) -> Option<usize> {
    let mut at = 0;
    while at < bytes.len() {
        let Some(len) = sequence_len(bytes[at]) else {
            return Some(at);
        };
        if at + len > bytes.len() {
            return Some(at);
        }
        for offset in 1..len {
            if !is_continuation(bytes[at + offset]) {
                return Some(at + offset);
            }
        }
        at += len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_widths() {
        let text = "aé€😀";
        let bytes = text.as_bytes();

        let (c, next) = decode(bytes, 0);
        assert_eq!((c, next), ('a' as u32, 1));
        let (c, next) = decode(bytes, next);
        assert_eq!((c, next), ('é' as u32, 3));
        let (c, next) = decode(bytes, next);
        assert_eq!((c, next), ('€' as u32, 6));
        let (c, next) = decode(bytes, next);
        assert_eq!((c, next), ('😀' as u32, 10));
    }

    #[test]
    fn test_skip_forward_and_backward() {
        let bytes = "a€😀b".as_bytes();
        assert_eq!(skip_forward(bytes, 0), 1);
        assert_eq!(skip_forward(bytes, 1), 4);
        assert_eq!(skip_forward(bytes, 4), 8);
        assert_eq!(skip_backward(bytes, 9), 8);
        assert_eq!(skip_backward(bytes, 8), 4);
        assert_eq!(skip_backward(bytes, 4), 1);
        assert_eq!(skip_backward(bytes, 1), 0);
    }

    #[test]
    fn test_validate_accepts_std_strings() {
        assert!(validate(b""));
        assert!(validate("plain ascii".as_bytes()));
        assert!(validate("ünïcödé ✓ 𝄞".as_bytes()));
    }

    #[test]
    fn test_validate_rejects_bad_continuation() {
        assert!(!validate(&[0xC3, 0x28]));
        assert!(!validate(&[0xE2, 0x82, 0x28]));
        assert_eq!(first_invalid(&[b'a', 0xE2, 0x28, 0xA1]), Some(2));
    }

    #[test]
    fn test_validate_rejects_truncated_sequence() {
        assert!(!validate(&[b'a', 0xF0, 0x9F, 0x98]));
        assert_eq!(first_invalid(&[b'a', 0xC3]), Some(1));
    }

    #[test]
    fn test_validate_rejects_bad_leaders() {
        // lone continuation byte
        assert!(!validate(&[0x80]));
        // five byte form
        assert!(!validate(&[0xF8, 0x80, 0x80, 0x80, 0x80]));
        assert!(!validate(&[0xFF]));
    }

    #[test]
    fn test_validate_is_structural_only() {
        // overlong '/' and an encoded surrogate are layout-valid
        assert!(validate(&[0xC0, 0xAF]));
        assert!(validate(&[0xED, 0xA0, 0x80]));
        assert_eq!(decode(&[0xED, 0xA0, 0x80], 0), (0xD800, 3));
    }
}
