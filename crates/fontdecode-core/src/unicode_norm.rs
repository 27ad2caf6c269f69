//! Unicode normalization for decoded text.

use unicode_normalization::UnicodeNormalization;

/// Unicode normalization form applied to a decoded string.
///
/// ToUnicode programs written by different producers disagree on composed
/// versus decomposed forms and on ligature code points. Normalizing the
/// decoded text makes the output comparable across fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// Leave decoded text as produced (default).
    #[default]
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Canonical Decomposition (NFD).
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    Nfkc,
    /// Compatibility Decomposition (NFKD).
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form, consuming the decoded string.
    ///
    /// `None` hands the input back without reallocating.
    pub fn apply(&self, text: String) -> String {
        match self {
            UnicodeNorm::None => text,
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}
