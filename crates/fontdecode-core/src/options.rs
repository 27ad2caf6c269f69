//! Options controlling how fragments are decoded.

use crate::unicode_norm::UnicodeNorm;

/// Coarse inter-literal spacing heuristic.
///
/// Text-showing operands interleave literal runs with numeric position
/// adjustments. Instead of computing real text-space geometry, a gap
/// between two literals is read as a number and a single space is inferred
/// when that number is below `space_threshold`. Gaps longer than
/// `max_gap_len` bytes never produce a space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpacingHeuristic {
    /// Longest gap (in bytes) still inspected for a spacing number (default: 8).
    pub max_gap_len: usize,
    /// A gap value strictly below this inserts one space (default: -50.0).
    pub space_threshold: f64,
}

impl Default for SpacingHeuristic {
    fn default() -> Self {
        Self {
            max_gap_len: 8,
            space_threshold: -50.0,
        }
    }
}

impl SpacingHeuristic {
    /// Whether a gap of `gap_len` bytes holding `value` inserts a space.
    pub fn inserts_space(&self, gap_len: usize, value: f64) -> bool {
        gap_len <= self.max_gap_len && value < self.space_threshold
    }
}

/// How bytes with no CMap or encoding mapping are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawTextFallback {
    /// Each byte becomes the code point of the same value (U+0000–U+00FF).
    #[default]
    Latin1,
    /// Bytes are read as Windows code page 1252.
    Windows1252,
    /// Bytes are read as UTF-8, invalid sequences become U+FFFD.
    Utf8Lossy,
}

/// Options shared by every decoding entry point of a font decoder.
///
/// All defaults reproduce the reference decoding behavior; the knobs exist
/// for callers that need different output text, not different parsing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// Spacing heuristic applied between parenthesized literals.
    pub spacing: SpacingHeuristic,
    /// Conversion used for pass-through bytes (default: Latin1).
    pub raw_text: RawTextFallback,
    /// Normalization applied to every decoded string (default: None).
    pub unicode_norm: UnicodeNorm,
    /// Whether to collect warnings while decoding (default: true).
    pub collect_warnings: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            spacing: SpacingHeuristic::default(),
            raw_text: RawTextFallback::default(),
            unicode_norm: UnicodeNorm::None,
            collect_warnings: true,
        }
    }
}
