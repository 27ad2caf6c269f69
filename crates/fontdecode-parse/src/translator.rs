//! Per-character translation through an encoding table or a ToUnicode CMap.
//!
//! [`CharacterTranslator`] borrows the font's resolved state and never
//! fails: codes without a mapping come back as the input text.

use std::sync::LazyLock;

use fontdecode_core::{DecodeWarning, DecodeWarningCode, EncodingTable, RawTextFallback};
use regex::bytes::Regex;

use crate::cmap::{CMapTable, hex_value};
use crate::tokenizer::leading_int;

/// A `<hex>` run and the position adjustment written after it.
static HEX_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)<([0-9A-Za-z]+)>\s*([\-0-9.]*)").expect("valid hex run pattern")
});

/// A character code as it appears in a content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCode<'a> {
    /// Raw bytes of a literal string, read as a big-endian integer.
    Bytes(&'a [u8]),
    /// Hex digits from a hex string. Fewer than four digits are padded on
    /// the right with `0` before lookup.
    Hex(&'a str),
}

/// Translates codes of one font to Unicode text.
#[derive(Clone, Copy)]
pub struct CharacterTranslator<'a> {
    encoding: Option<&'a dyn EncodingTable>,
    cmap: Option<&'a CMapTable>,
    raw_text: RawTextFallback,
}

impl std::fmt::Debug for CharacterTranslator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterTranslator")
            .field("encoding", &self.encoding.is_some())
            .field("cmap", &self.cmap)
            .field("raw_text", &self.raw_text)
            .finish()
    }
}

impl<'a> CharacterTranslator<'a> {
    /// Create a translator.
    ///
    /// `cmap` is `None` when the font has no ToUnicode entry at all; a
    /// present but empty program is `Some` of an empty table.
    pub fn new(
        encoding: Option<&'a dyn EncodingTable>,
        cmap: Option<&'a CMapTable>,
        raw_text: RawTextFallback,
    ) -> Self {
        Self {
            encoding,
            cmap,
            raw_text,
        }
    }

    /// A translator with neither encoding nor CMap; everything passes through.
    pub fn passthrough(raw_text: RawTextFallback) -> Self {
        Self::new(None, None, raw_text)
    }

    /// Translate one character code through the CMap.
    ///
    /// Unmapped codes return the input unchanged: hex codes as the digits
    /// that were passed in, byte codes as raw text.
    pub fn translate_char(&self, code: CharCode<'_>) -> String {
        match code {
            CharCode::Hex(digits) => {
                let padded = format!("{digits:0<4}");
                hex_value(&padded)
                    .and_then(|value| self.lookup(value))
                    .unwrap_or_else(|| digits.to_string())
            }
            CharCode::Bytes(bytes) => bytes
                .iter()
                .try_fold(0u32, |acc, &b| acc.checked_mul(256)?.checked_add(u32::from(b)))
                .and_then(|value| self.lookup(value))
                .unwrap_or_else(|| bytes_to_text(bytes, self.raw_text)),
        }
    }

    /// Decode the (already unescaped) bytes of a parenthesized literal.
    ///
    /// The encoding table takes precedence over the CMap. With neither,
    /// the bytes are returned as raw text.
    pub fn decode_content(&self, bytes: &[u8], warnings: &mut Vec<DecodeWarning>) -> String {
        if let Some(encoding) = self.encoding {
            let mut out = String::with_capacity(bytes.len());
            for &b in bytes {
                let cp = encoding.translate_char(b);
                match char::from_u32(cp) {
                    Some(ch) => out.push(ch),
                    None => {
                        warnings.push(DecodeWarning::with_code(
                            DecodeWarningCode::InvalidCodepoint,
                            format!("encoding maps byte {b:#04x} to invalid code point {cp:#x}"),
                        ));
                        out.push_str(&bytes_to_text(&[b], self.raw_text));
                    }
                }
            }
            return out;
        }

        if let Some(cmap) = self.cmap {
            let mut out = String::with_capacity(bytes.len());
            // Unmapped bytes are converted as runs so multi-byte raw text survives.
            let mut pending: Vec<u8> = Vec::new();
            for &b in bytes {
                match cmap.lookup(u32::from(b)) {
                    Some(mapped) => {
                        if !pending.is_empty() {
                            out.push_str(&bytes_to_text(&pending, self.raw_text));
                            pending.clear();
                        }
                        out.push_str(&mapped);
                    }
                    None => pending.push(b),
                }
            }
            if !pending.is_empty() {
                out.push_str(&bytes_to_text(&pending, self.raw_text));
            }
            return out;
        }

        bytes_to_text(bytes, self.raw_text)
    }

    /// Decode every `<hex>` run in `fragment`.
    ///
    /// Digits are taken four at a time (the last group may be shorter) and
    /// translated with [`CharCode::Hex`]. A run followed by a negative
    /// position adjustment gets one trailing space. Adjustments are read
    /// as integers, so `-0.5` does not count as negative.
    pub fn decode_hexadecimal(&self, fragment: &[u8]) -> String {
        let mut text = String::new();

        for caps in HEX_RUN.captures_iter(fragment) {
            let Some(data) = caps.get(1) else {
                continue;
            };
            // The pattern only admits ASCII alphanumerics.
            let digits = String::from_utf8_lossy(data.as_bytes());
            let mut start = 0;
            while start < digits.len() {
                let end = (start + 4).min(digits.len());
                text.push_str(&self.translate_char(CharCode::Hex(&digits[start..end])));
                start = end;
            }

            let position = caps.get(2).map_or(&b""[..], |m| m.as_bytes());
            if leading_int(position) < 0 {
                text.push(' ');
            }
        }

        text
    }

    fn lookup(&self, code: u32) -> Option<String> {
        self.cmap
            .and_then(|cmap| cmap.lookup(code))
            .map(|s| s.into_owned())
    }
}

/// Convert pass-through bytes to text.
pub fn bytes_to_text(bytes: &[u8], fallback: RawTextFallback) -> String {
    match fallback {
        RawTextFallback::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        RawTextFallback::Windows1252 => {
            let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
        RawTextFallback::Utf8Lossy => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontdecode_core::DifferencesEncoding;

    fn ab_cmap() -> CMapTable {
        CMapTable::parse(b"beginbfchar\n<0041> <0041>\n<0042> <0042>\nendbfchar\n")
    }

    struct Broken;

    impl EncodingTable for Broken {
        fn translate_char(&self, _code: u8) -> u32 {
            0xD800
        }
    }

    // --- translate_char ---

    #[test]
    fn translate_hex_full_width_code() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.translate_char(CharCode::Hex("0041")), "A");
    }

    #[test]
    fn translate_hex_short_code_is_right_padded() {
        let cmap = CMapTable::parse(b"beginbfchar\n<4100> <005A>\nendbfchar\n");
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.translate_char(CharCode::Hex("41")), "Z");
    }

    #[test]
    fn translate_hex_unmapped_returns_input() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.translate_char(CharCode::Hex("0099")), "0099");
        assert_eq!(t.translate_char(CharCode::Hex("41")), "41");
    }

    #[test]
    fn translate_bytes_big_endian() {
        let cmap = CMapTable::parse(b"beginbfchar\n<0102> <4E2D>\nendbfchar\n");
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.translate_char(CharCode::Bytes(&[0x01, 0x02])), "中");
    }

    #[test]
    fn translate_bytes_unmapped_returns_raw_text() {
        let t = CharacterTranslator::passthrough(RawTextFallback::Latin1);
        assert_eq!(t.translate_char(CharCode::Bytes(b"A")), "A");
        assert_eq!(t.translate_char(CharCode::Bytes(&[0xE9])), "\u{00E9}");
    }

    // --- decode_content ---

    #[test]
    fn content_passthrough_without_tables() {
        let t = CharacterTranslator::passthrough(RawTextFallback::Latin1);
        let mut w = Vec::new();
        assert_eq!(t.decode_content(b"Hello", &mut w), "Hello");
        assert!(w.is_empty());
    }

    #[test]
    fn content_through_cmap() {
        let cmap = CMapTable::parse(b"beginbfrange\n<01> <1A> <0061>\nendbfrange\n");
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        let mut w = Vec::new();
        assert_eq!(t.decode_content(&[0x08, 0x09], &mut w), "hi");
    }

    #[test]
    fn content_cmap_unmapped_bytes_pass_through() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        let mut w = Vec::new();
        assert_eq!(t.decode_content(b"xAy", &mut w), "xAy");
    }

    #[test]
    fn content_cmap_keeps_utf8_runs_together() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Utf8Lossy);
        let mut w = Vec::new();
        assert_eq!(t.decode_content("é-A".as_bytes(), &mut w), "é-A");
    }

    #[test]
    fn content_encoding_takes_precedence_over_cmap() {
        let cmap = CMapTable::parse(b"beginbfchar\n<41> <0078>\nendbfchar\n");
        let enc = DifferencesEncoding::with_differences(&[(0x41, 'Q')]);
        let t = CharacterTranslator::new(Some(&enc), Some(&cmap), RawTextFallback::Latin1);
        let mut w = Vec::new();
        assert_eq!(t.decode_content(b"AB", &mut w), "QB");
    }

    #[test]
    fn content_encoding_invalid_code_point_falls_back() {
        let t = CharacterTranslator::new(Some(&Broken), None, RawTextFallback::Latin1);
        let mut w = Vec::new();
        assert_eq!(t.decode_content(b"A", &mut w), "A");
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].code, DecodeWarningCode::InvalidCodepoint);
    }

    // --- decode_hexadecimal ---

    #[test]
    fn hex_string_in_four_digit_groups() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"<00410042>"), "AB");
    }

    #[test]
    fn hex_negative_adjustment_adds_space() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"[<0041> -250 <0042>] TJ"), "A B");
    }

    #[test]
    fn hex_positive_or_fractional_adjustment_adds_nothing() {
        let cmap = ab_cmap();
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"[<0041> 120 <0042>]"), "AB");
        assert_eq!(t.decode_hexadecimal(b"[<0041> -0.5 <0042>]"), "AB");
    }

    #[test]
    fn hex_trailing_short_group() {
        let cmap = CMapTable::parse(b"beginbfchar\n<0041> <0041>\n<4200> <0042>\nendbfchar\n");
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"<004142>"), "AB");
    }

    #[test]
    fn hex_unmapped_groups_pass_through() {
        let t = CharacterTranslator::passthrough(RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"<00410042>"), "00410042");
    }

    #[test]
    fn hex_lowercase_digits() {
        let cmap = CMapTable::parse(b"beginbfchar\n<00e9> <00e9>\nendbfchar\n");
        let t = CharacterTranslator::new(None, Some(&cmap), RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"<00e9>"), "\u{00E9}");
    }

    #[test]
    fn hex_without_runs_is_empty() {
        let t = CharacterTranslator::passthrough(RawTextFallback::Latin1);
        assert_eq!(t.decode_hexadecimal(b"(not hex) Tj"), "");
    }

    // --- bytes_to_text ---

    #[test]
    fn raw_text_fallbacks() {
        assert_eq!(bytes_to_text(&[0x80], RawTextFallback::Latin1), "\u{0080}");
        assert_eq!(bytes_to_text(&[0x80], RawTextFallback::Windows1252), "\u{20AC}");
        assert_eq!(bytes_to_text(&[0x80], RawTextFallback::Utf8Lossy), "\u{FFFD}");
        assert_eq!(
            bytes_to_text("ü".as_bytes(), RawTextFallback::Utf8Lossy),
            "ü"
        );
    }
}
