//! Percent-encoding (`%XX` escapes).
//!
//! Decoding never fails loudly: malformed input yields `None` and the caller
//! decides what to fall back to.

/// Value of an ASCII hex digit.
#[inline]
const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Decode every `%XX` escape in `input`.
///
/// Returns `None` if a `%` is not followed by two hex digits.
///
/// # Examples
///
/// ```
/// use microuri_rs::percent;
///
/// assert_eq!(percent::decode(b"caf%C3%A9").as_deref(), Some("café"));
/// assert_eq!(percent::decode(b"100%"), None);
/// ```
pub fn decode(input: &[u8]) -> Option<String> {
    decode_excluding(input, &[])
}

/// Decode `%XX` escapes, except those that decode to a byte in `excluding`.
///
/// Excluded escapes are copied through verbatim, so a value can be unescaped
/// without turning `%26` into a literal `&`.
///
/// ```
/// use microuri_rs::percent;
///
/// let decoded = percent::decode_excluding(b"a%26b%20c", b"&=");
/// assert_eq!(decoded.as_deref(), Some("a%26b c"));
/// ```
pub fn decode_excluding(input: &[u8], excluding: &[u8]) -> Option<String> {
    // escapes only shrink the output
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte != b'%' {
            output.push(byte);
            i += 1;
            continue;
        }
        let high = hex_value(*input.get(i + 1)?)?;
        let low = hex_value(*input.get(i + 2)?)?;
        let decoded = (high << 4) | low;
        if excluding.contains(&decoded) {
            output.extend_from_slice(&input[i..i + 3]);
        } else {
            output.push(decoded);
        }
        i += 3;
    }
    Some(match String::from_utf8(output) {
        Ok(string) => string,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Decode an `application/x-www-form-urlencoded` value: `+` is a space,
/// then `%XX` escapes are decoded.
pub fn decode_form(input: &[u8]) -> Option<String> {
    let spaced: Vec<u8> = input
        .iter()
        .map(|&byte| if byte == b'+' { b' ' } else { byte })
        .collect();
    decode(&spaced)
}

/// Whether `byte` is an RFC 3986 unreserved character.
#[inline]
pub const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Escape every byte that is not unreserved as `%XX` (uppercase hex).
///
/// ```
/// use microuri_rs::percent;
///
/// assert_eq!(percent::encode("a b&c".as_bytes()), "a%20b%26c");
/// ```
pub fn encode(input: &[u8]) -> String {
    encode_with(input, is_unreserved)
}

/// Escape every byte for which `keep` returns `false`.
pub fn encode_with(input: &[u8], keep: impl Fn(u8) -> bool) -> String {
    let mut output = String::with_capacity(input.len());
    for &byte in input {
        if keep(byte) {
            output.push(byte as char);
        } else {
            output.push('%');
            output.push(HEX_UPPER[(byte >> 4) as usize] as char);
            output.push(HEX_UPPER[(byte & 0x0F) as usize] as char);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_decode_plain_text() {
        assert_eq!(decode(b"hello").as_deref(), Some("hello"));
        assert_eq!(decode(b"").as_deref(), Some(""));
    }

    #[test]
    fn test_decode_mixed_case_hex() {
        assert_eq!(decode(b"%2f%2F%3d").as_deref(), Some("//="));
    }

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(decode(b"%E2%82%AC 5").as_deref(), Some("€ 5"));
    }

    #[test]
    fn test_decode_truncated_escape() {
        assert_eq!(decode(b"%"), None);
        assert_eq!(decode(b"abc%4"), None);
    }

    #[test]
    fn test_decode_non_hex_digit() {
        assert_eq!(decode(b"%G0"), None);
        assert_eq!(decode(b"%0z"), None);
        assert_eq!(decode(b"%%41"), None);
    }

    #[test]
    fn test_decode_excluding_keeps_original_escape() {
        assert_eq!(
            decode_excluding(b"%3d%3D%41", b"=").as_deref(),
            Some("%3d%3DA")
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        assert_eq!(decode(b"%FFa").as_deref(), Some("\u{FFFD}a"));
    }

    #[test]
    fn test_decode_form_plus() {
        assert_eq!(decode_form(b"a+b%2Bc").as_deref(), Some("a b+c"));
    }

    #[test]
    fn test_encode_reserved() {
        assert_eq!(encode(b"AZaz09-._~"), "AZaz09-._~");
        assert_eq!(encode("/?#[]@ é".as_bytes()), "%2F%3F%23%5B%5D%40%20%C3%A9");
    }

    #[quickcheck]
    fn prop_encode_decode_round_trip(input: String) -> bool {
        decode(encode(input.as_bytes()).as_bytes()).as_deref() == Some(input.as_str())
    }

    #[quickcheck]
    fn prop_decode_without_percent_is_identity(input: String) -> bool {
        let input = input.replace('%', "");
        decode(input.as_bytes()).as_deref() == Some(input.as_str())
    }

    #[quickcheck]
    fn prop_non_hex_escape_fails(x: u8, y: u8) -> bool {
        if hex_value(x).is_some() && hex_value(y).is_some() {
            return true;
        }
        decode(&[b'%', x, y]).is_none()
    }
}
