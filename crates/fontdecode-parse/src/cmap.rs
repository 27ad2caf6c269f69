//! ToUnicode CMap table for mapping character codes to Unicode strings.
//!
//! Parses the `beginbfchar`/`endbfchar` and `beginbfrange`/`endbfrange`
//! blocks of a font's `/ToUnicode` program. Every bfchar block is applied
//! first, then every bfrange block, so a code covered by both ends up with
//! the bfrange mapping. Entries that do not match the expected token shape
//! are skipped without error.
//!
//! Ranges are not expanded eagerly. They are painted, in source order, into
//! a map of disjoint segments; a lookup checks the segment covering the
//! code and falls back to the bfchar entries. The observable mapping is the
//! same as expanding every range code by code with last-write-wins.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use fontdecode_core::{DecodeResult, DecodeWarning, DecodeWarningCode};
use regex::Regex;

/// `<from> <to>` followed by whitespace.
static BFCHAR_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([0-9A-Za-z]+)>[ \t]+<([0-9A-Za-z]+)>\s+").expect("valid bfchar pattern")
});

/// `<from> <to> <offset>` followed by whitespace, or `<from> <to> [<dst> ...]`.
static BFRANGE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([0-9A-Za-z]+)>[ \t]*<([0-9A-Za-z]+)>[ \t]*(?:<([0-9A-Za-z]+)>\s+|\[([^\]]*)\])")
        .expect("valid bfrange pattern")
});

/// A single `<token>` inside an array destination.
static HEX_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([0-9A-Za-z]+)>").expect("valid hex token pattern"));

/// One `bfrange` triple as written in the CMap program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CMapRange {
    /// First source code of the range.
    pub from: u32,
    /// Last source code of the range (inclusive).
    pub to: u32,
    /// Code point assigned to `from`; later codes count up from here.
    pub offset: u32,
}

impl CMapRange {
    /// Whether `code` lies within `[from, to]`.
    pub fn contains(&self, code: u32) -> bool {
        self.from <= code && code <= self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SegmentValue {
    /// `code - from + offset`, as a single code point.
    Offset { from: u32, offset: u32 },
    /// A fixed string from an array destination.
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    end: u32,
    value: SegmentValue,
}

/// A parsed ToUnicode CMap.
///
/// Built once from the program text and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct CMapTable {
    /// bfchar mappings.
    chars: HashMap<u32, String>,
    /// bfrange triples in source order, kept for introspection.
    ranges: Vec<CMapRange>,
    /// Disjoint segments keyed by their first code.
    segments: BTreeMap<u32, Segment>,
}

impl CMapTable {
    /// Parse a ToUnicode CMap program, discarding warnings.
    pub fn parse(data: &[u8]) -> Self {
        Self::parse_with_warnings(data).value
    }

    /// Parse a ToUnicode CMap program.
    ///
    /// Never fails; skipped or unusable entries are reported as warnings.
    pub fn parse_with_warnings(data: &[u8]) -> DecodeResult<Self> {
        let text = String::from_utf8_lossy(data);
        let mut table = CMapTable::default();
        let mut warnings = Vec::new();

        for (base, section) in sections(&text, "beginbfchar", "endbfchar") {
            table.parse_bfchar_section(base, section, &mut warnings);
        }
        for (base, section) in sections(&text, "beginbfrange", "endbfrange") {
            table.parse_bfrange_section(base, section, &mut warnings);
        }

        tracing::debug!(
            chars = table.chars.len(),
            ranges = table.ranges.len(),
            segments = table.segments.len(),
            "parsed ToUnicode CMap"
        );

        DecodeResult::with_warnings(table, warnings)
    }

    /// Look up the Unicode string for a character code.
    ///
    /// Returns `None` if the code has no mapping.
    pub fn lookup(&self, code: u32) -> Option<Cow<'_, str>> {
        if let Some((_, segment)) = self.segments.range(..=code).next_back() {
            if code <= segment.end {
                return match &segment.value {
                    SegmentValue::Offset { from, offset } => (code - from)
                        .checked_add(*offset)
                        .and_then(char::from_u32)
                        .map(|ch| Cow::Owned(ch.to_string())),
                    SegmentValue::Fixed(s) => Some(Cow::Borrowed(s.as_str())),
                };
            }
        }
        self.chars.get(&code).map(|s| Cow::Borrowed(s.as_str()))
    }

    /// Whether `code` has a mapping.
    pub fn contains(&self, code: u32) -> bool {
        self.lookup(code).is_some()
    }

    /// bfrange triples in the order they appear in the program.
    pub fn ranges(&self) -> &[CMapRange] {
        &self.ranges
    }

    /// Number of codes covered by a bfchar entry or a range.
    pub fn len(&self) -> usize {
        let covered = |code: u32| {
            self.segments
                .range(..=code)
                .next_back()
                .is_some_and(|(_, seg)| code <= seg.end)
        };
        let ranged: usize = self
            .segments
            .iter()
            .map(|(start, seg)| (seg.end - start) as usize + 1)
            .sum();
        let explicit = self.chars.keys().filter(|&&code| !covered(code)).count();
        ranged + explicit
    }

    /// Returns true if this CMap has no mappings.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty() && self.segments.is_empty()
    }

    fn parse_bfchar_section(
        &mut self,
        base: usize,
        section: &str,
        warnings: &mut Vec<DecodeWarning>,
    ) {
        for caps in BFCHAR_ENTRY.captures_iter(section) {
            let at = base + caps.get(0).map_or(0, |m| m.start());
            let (Some(src), Some(dst)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Some(code) = hex_value(src.as_str()) else {
                warnings.push(malformed(format!("bfchar source <{}> overflows", src.as_str()), at));
                continue;
            };
            match decode_destination(dst.as_str()) {
                Some(text) => {
                    self.chars.insert(code, text);
                }
                None => warnings.push(invalid_codepoint(dst.as_str(), at)),
            }
        }
    }

    fn parse_bfrange_section(
        &mut self,
        base: usize,
        section: &str,
        warnings: &mut Vec<DecodeWarning>,
    ) {
        for caps in BFRANGE_ENTRY.captures_iter(section) {
            let at = base + caps.get(0).map_or(0, |m| m.start());
            let (Some(lo), Some(hi)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let (Some(from), Some(to)) = (hex_value(lo.as_str()), hex_value(hi.as_str())) else {
                warnings.push(malformed(
                    format!("bfrange bounds <{}> <{}> overflow", lo.as_str(), hi.as_str()),
                    at,
                ));
                continue;
            };

            if let Some(dst) = caps.get(3) {
                let Some(offset) = hex_value(dst.as_str()) else {
                    warnings.push(malformed(
                        format!("bfrange destination <{}> overflows", dst.as_str()),
                        at,
                    ));
                    continue;
                };
                self.ranges.push(CMapRange { from, to, offset });
                if from <= to {
                    // codes landing on a non-scalar stay unmapped, even over a bfchar
                    if !offset_span_is_scalar(offset, to - from) {
                        warnings.push(invalid_range(dst.as_str(), from, to, at));
                    }
                    self.paint(from, to, SegmentValue::Offset { from, offset });
                }
            } else if let Some(array) = caps.get(4) {
                let mut code = from;
                for token in HEX_TOKEN.captures_iter(array.as_str()) {
                    if code > to {
                        break;
                    }
                    let Some(dst) = token.get(1) else {
                        continue;
                    };
                    match decode_destination(dst.as_str()) {
                        Some(text) => self.paint(code, code, SegmentValue::Fixed(text)),
                        None => warnings.push(invalid_codepoint(dst.as_str(), at)),
                    }
                    match code.checked_add(1) {
                        Some(next) => code = next,
                        None => break,
                    }
                }
            }
        }
    }

    /// Paint `[start, end]` with `value`, overwriting whatever was there.
    fn paint(&mut self, start: u32, end: u32, value: SegmentValue) {
        // A segment beginning before `start` may reach into the new range.
        let straddling = self
            .segments
            .range(..start)
            .next_back()
            .filter(|(_, seg)| seg.end >= start)
            .map(|(&key, seg)| (key, seg.clone()));
        if let Some((prev_start, prev)) = straddling {
            self.segments.insert(
                prev_start,
                Segment {
                    end: start - 1,
                    value: prev.value.clone(),
                },
            );
            if prev.end > end {
                self.segments.insert(
                    end + 1,
                    Segment {
                        end: prev.end,
                        value: prev.value,
                    },
                );
            }
        }

        let inside: Vec<u32> = self.segments.range(start..=end).map(|(&k, _)| k).collect();
        for key in inside {
            if let Some(seg) = self.segments.remove(&key) {
                if seg.end > end {
                    self.segments.insert(
                        end + 1,
                        Segment {
                            end: seg.end,
                            value: seg.value,
                        },
                    );
                }
            }
        }

        self.segments.insert(start, Segment { end, value });
    }
}

/// Yield `(offset, body)` for every `begin…end` block in `text`.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<(usize, &'a str)> {
    let mut out = Vec::new();
    let mut search_from = 0;
    while let Some(start) = text[search_from..].find(begin) {
        let section_start = search_from + start + begin.len();
        let Some(len) = text[section_start..].find(end) else {
            break;
        };
        out.push((section_start, &text[section_start..section_start + len]));
        search_from = section_start + len + end.len();
    }
    out
}

/// Numeric value of a hex token, ignoring characters that are not hex digits.
///
/// An empty digit sequence is zero. Returns `None` on `u32` overflow.
pub(crate) fn hex_value(token: &str) -> Option<u32> {
    token
        .chars()
        .filter_map(|c| c.to_digit(16))
        .try_fold(0u32, |acc, d| acc.checked_mul(16)?.checked_add(d))
}

/// Decode a bfchar (or array) destination token.
///
/// Up to four digits name a single code point. Longer tokens are UTF-16BE
/// code units (surrogate pairs, ligatures); if they are not valid UTF-16
/// the whole token is tried as one code point.
fn decode_destination(token: &str) -> Option<String> {
    if token.len() > 4 {
        if let Some(text) = decode_utf16be_hex(token) {
            return Some(text);
        }
    }
    hex_value(token)
        .and_then(char::from_u32)
        .map(|ch| ch.to_string())
}

fn decode_utf16be_hex(hex: &str) -> Option<String> {
    if hex.len() % 4 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let units: Vec<u16> = hex
        .as_bytes()
        .chunks(4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .filter_map(|chunk| u16::from_str_radix(chunk, 16).ok())
        .collect();
    String::from_utf16(&units).ok()
}

fn malformed(description: String, offset: usize) -> DecodeWarning {
    DecodeWarning::with_code(DecodeWarningCode::MalformedCMapEntry, description).at_offset(offset)
}

/// Whether every value in `offset..=offset + span` is a Unicode scalar value.
fn offset_span_is_scalar(offset: u32, span: u32) -> bool {
    let last = u64::from(offset) + u64::from(span);
    last <= 0x10FFFF && (last < 0xD800 || offset > 0xDFFF)
}

fn invalid_range(token: &str, from: u32, to: u32, offset: usize) -> DecodeWarning {
    DecodeWarning::with_code(
        DecodeWarningCode::InvalidCodepoint,
        format!("bfrange <{from:X}> <{to:X}> from <{token}> leaves non-scalar codes unmapped"),
    )
    .at_offset(offset)
}

fn invalid_codepoint(token: &str, offset: usize) -> DecodeWarning {
    DecodeWarning::with_code(
        DecodeWarningCode::InvalidCodepoint,
        format!("destination <{token}> is not a Unicode scalar value"),
    )
    .at_offset(offset)
}
