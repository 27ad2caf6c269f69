//! Escape handling for literal string runs.
//!
//! Two passes with deliberately different scopes: [`decode_octal`] runs once
//! over a whole fragment before any literal is located, and
//! [`unescape_literal`] runs over the interior of each literal afterwards.

/// Replace every `\ddd` (backslash + exactly three decimal digits) with the
/// single byte whose value is the octal reading of those digits.
///
/// Digits 8 and 9 are accepted by the match but contribute nothing to the
/// value, and values above 0o377 wrap to a byte. Replacement is a single
/// left-to-right pass; bytes produced by a replacement are not re-scanned.
pub fn decode_octal(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut pos = 0;

    while pos < text.len() {
        if text[pos] == b'\\' {
            if let Some(digits) = text.get(pos + 1..pos + 4) {
                if digits.iter().all(u8::is_ascii_digit) {
                    out.push(octal_byte(digits));
                    pos += 4;
                    continue;
                }
            }
        }
        out.push(text[pos]);
        pos += 1;
    }

    out
}

fn octal_byte(digits: &[u8]) -> u8 {
    let value = digits
        .iter()
        .filter(|d| (b'0'..=b'7').contains(*d))
        .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
    (value % 256) as u8
}

/// Sequence substitutions applied by [`unescape_literal`], in order.
const LITERAL_ESCAPES: [(&[u8], &[u8]); 5] = [
    (b"\\\\", b"\\"),
    (b"\\(", b"("),
    (b"\\)", b")"),
    (b"\\n", b"\n"),
    (b"\\r", b"\r"),
];

/// Resolve `\\`, `\(`, `\)`, `\n` and `\r` inside an extracted literal.
///
/// Each substitution is a separate pass over the whole run, in that fixed
/// order, so the output of one pass is input to the next (`\\n` ends up as
/// a newline).
pub fn unescape_literal(text: &[u8]) -> Vec<u8> {
    LITERAL_ESCAPES
        .iter()
        .fold(text.to_vec(), |acc, (from, to)| replace_all(&acc, from, to))
}

fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut pos = 0;
    while pos < haystack.len() {
        if haystack[pos..].starts_with(needle) {
            out.extend_from_slice(replacement);
            pos += needle.len();
        } else {
            out.push(haystack[pos]);
            pos += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octal_single_escape() {
        assert_eq!(decode_octal(b"\\101"), b"A");
    }

    #[test]
    fn octal_inside_text() {
        assert_eq!(decode_octal(b"(caf\\351)"), b"(caf\xE9)");
    }

    #[test]
    fn octal_multiple_escapes() {
        assert_eq!(decode_octal(b"\\110\\151"), b"Hi");
    }

    #[test]
    fn octal_requires_three_digits() {
        assert_eq!(decode_octal(b"\\10)"), b"\\10)");
        assert_eq!(decode_octal(b"\\1"), b"\\1");
        assert_eq!(decode_octal(b"\\"), b"\\");
    }

    #[test]
    fn octal_only_consumes_three_digits() {
        assert_eq!(decode_octal(b"\\1011"), b"A1");
    }

    #[test]
    fn octal_ignores_non_octal_digits() {
        // 8 and 9 match the pattern but are dropped from the value
        assert_eq!(decode_octal(b"\\189"), vec![1u8]);
        assert_eq!(decode_octal(b"\\099"), vec![0u8]);
    }

    #[test]
    fn octal_wraps_above_255() {
        assert_eq!(decode_octal(b"\\777"), vec![0xFFu8]);
        assert_eq!(decode_octal(b"\\400"), vec![0x00u8]);
    }

    #[test]
    fn octal_is_not_rescanned() {
        // \134 is a backslash; the following "101" stays literal
        assert_eq!(decode_octal(b"\\134101"), b"\\101");
    }

    #[test]
    fn octal_after_escaped_backslash_still_decodes() {
        assert_eq!(decode_octal(b"\\\\101"), b"\\A");
    }

    #[test]
    fn octal_leaves_other_escapes() {
        assert_eq!(decode_octal(b"a\\(b\\)"), b"a\\(b\\)");
    }

    #[test]
    fn unescape_parentheses() {
        assert_eq!(unescape_literal(b"a\\(b\\)"), b"a(b)");
    }

    #[test]
    fn unescape_backslash() {
        assert_eq!(unescape_literal(b"C:\\\\dir"), b"C:\\dir");
    }

    #[test]
    fn unescape_newline_and_return() {
        assert_eq!(unescape_literal(b"a\\nb\\rc"), b"a\nb\rc");
    }

    #[test]
    fn unescape_passes_feed_each_other() {
        // "\\n" -> "\n" (backslash pass) -> newline (newline pass)
        assert_eq!(unescape_literal(b"\\\\n"), b"\n");
    }

    #[test]
    fn unescape_leaves_unknown_escapes() {
        assert_eq!(unescape_literal(b"\\t\\b"), b"\\t\\b");
    }

    #[test]
    fn unescape_empty() {
        assert!(unescape_literal(b"").is_empty());
    }
}
