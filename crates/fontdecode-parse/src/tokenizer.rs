//! Scanner for text-showing operands.
//!
//! Splits a fragment such as `[(Hello)-300(World)] TJ` into spacing gaps
//! and parenthesized literal runs with an explicit byte cursor, decoding
//! each run through a [`CharacterTranslator`].

use fontdecode_core::{DecodeWarning, DecodeWarningCode, SpacingHeuristic};
use tracing::warn;

use crate::escape::{decode_octal, unescape_literal};
use crate::translator::CharacterTranslator;

/// Decode all parenthesized literal runs of `fragment`.
///
/// Octal escapes are resolved over the whole fragment first. A literal
/// ends at the first `)` preceded by an even number of backslashes;
/// nesting of unescaped parentheses is not tracked. If a literal never
/// terminates, scanning stops and the text decoded so far is returned.
pub fn decode_text(
    fragment: &[u8],
    translator: &CharacterTranslator<'_>,
    spacing: &SpacingHeuristic,
    warnings: &mut Vec<DecodeWarning>,
) -> String {
    let input = decode_octal(fragment);
    let mut text = String::new();
    let mut pos = 0;

    while let Some(open) = find_byte(&input, pos, b'(') {
        let gap = &input[pos..open];
        let space = spacing.inserts_space(gap.len(), leading_float(trim_ascii(gap)));

        let Some(close) = find_terminator(&input, open + 1) else {
            warn!(offset = open, "unterminated literal string, stopping");
            warnings.push(
                DecodeWarning::with_code(
                    DecodeWarningCode::UnterminatedLiteral,
                    "literal string has no closing parenthesis",
                )
                .at_offset(open),
            );
            break;
        };

        let content = unescape_literal(&input[open + 1..close]);
        if space {
            text.push(' ');
        }
        text.push_str(&translator.decode_content(&content, warnings));
        pos = close + 1;
    }

    text
}

fn find_byte(data: &[u8], from: usize, needle: u8) -> Option<usize> {
    data.get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

/// Position of the `)` closing a literal whose content starts at `start`.
fn find_terminator(data: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    while let Some(idx) = find_byte(data, pos, b')') {
        let backslashes = data[start..idx]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        if backslashes % 2 == 0 {
            return Some(idx);
        }
        pos = idx + 1;
    }
    None
}

fn trim_ascii(data: &[u8]) -> &[u8] {
    let is_space = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | 0x0B);
    let start = data.iter().position(|b| !is_space(b)).unwrap_or(data.len());
    let end = data.iter().rposition(|b| !is_space(b)).map_or(start, |i| i + 1);
    &data[start..end]
}

/// Read the longest numeric prefix of `data` as a float; `0.0` if there is none.
///
/// Accepts an optional sign, digits with an optional fractional part, and
/// an exponent only when digits follow it.
pub(crate) fn leading_float(data: &[u8]) -> f64 {
    let mut end = 0;
    if matches!(data.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_digits = count_digits(&data[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if data.get(end) == Some(&b'.') {
        frac_digits = count_digits(&data[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }
    if matches!(data.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(data.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&data[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    std::str::from_utf8(&data[..end])
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Read the leading integer of `data`, saturating on overflow; `0` if there is none.
pub(crate) fn leading_int(data: &[u8]) -> i64 {
    let data = trim_ascii(data);
    let (negative, digits) = match data.first() {
        Some(b'-') => (true, &data[1..]),
        Some(b'+') => (false, &data[1..]),
        _ => (false, data),
    };
    let mut value: i64 = 0;
    for &d in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i64::from(d - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

fn count_digits(data: &[u8]) -> usize {
    data.iter().take_while(|b| b.is_ascii_digit()).count()
}
