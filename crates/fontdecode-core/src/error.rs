//! Error and warning types for fontdecode-rs.
//!
//! Decoding itself never fails: malformed input degrades to pass-through
//! output. [`DecodeWarning`] records what was degraded and why,
//! [`DecodeResult`] pairs a decoded value with those warnings, and
//! [`DecodeError`] covers the few setup operations that can genuinely fail
//! (such as locating a font inside a document).

use std::fmt;

/// Fatal error types for font setup.
///
/// These are only produced while resolving the font resource a decoder is
/// built from, never while decoding text.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The requested font is not present in the resources that were searched.
    FontNotFound(String),
    /// A document object did not have the expected type or structure.
    InvalidObject(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::FontNotFound(name) => write!(f, "font not found: {name}"),
            DecodeError::InvalidObject(msg) => write!(f, "invalid object: {msg}"),
            DecodeError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Machine-readable warning code for categorizing degraded decoding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum DecodeWarningCode {
    /// A literal run had no closing `)`; output stops at the last complete run.
    UnterminatedLiteral,
    /// A mapping or encoding produced a value that is not a Unicode scalar.
    InvalidCodepoint,
    /// A CMap entry could not be interpreted and was skipped.
    MalformedCMapEntry,
    /// The ToUnicode entry exists but its program could not be read.
    UnreadableToUnicode,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl DecodeWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            DecodeWarningCode::UnterminatedLiteral => "UNTERMINATED_LITERAL",
            DecodeWarningCode::InvalidCodepoint => "INVALID_CODEPOINT",
            DecodeWarningCode::MalformedCMapEntry => "MALFORMED_CMAP_ENTRY",
            DecodeWarningCode::UnreadableToUnicode => "UNREADABLE_TOUNICODE",
            DecodeWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for DecodeWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered while decoding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeWarning {
    /// Machine-readable warning code.
    pub code: DecodeWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Byte offset into the decoded fragment or CMap program, if applicable.
    pub offset: Option<usize>,
    /// Font name associated with the warning, if known.
    pub font_name: Option<String>,
}

impl DecodeWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: DecodeWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            offset: None,
            font_name: None,
        }
    }

    /// Create a warning with just a description.
    ///
    /// Uses [`DecodeWarningCode::Other`] as the code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self::with_code(DecodeWarningCode::Other(desc.clone()), desc)
    }

    /// Attach a byte offset (builder pattern).
    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach a font name (builder pattern).
    pub fn for_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " [offset {offset}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a decoded value with collected warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult<T> {
    /// The decoded value.
    pub value: T,
    /// Warnings collected while decoding.
    pub warnings: Vec<DecodeWarning>,
}

impl<T> DecodeResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<DecodeWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DecodeResult<U> {
        DecodeResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        assert_eq!(
            DecodeError::FontNotFound("F1".to_string()).to_string(),
            "font not found: F1"
        );
        assert_eq!(
            DecodeError::InvalidObject("not a dictionary".to_string()).to_string(),
            "invalid object: not a dictionary"
        );
        assert_eq!(DecodeError::Other("boom".to_string()).to_string(), "boom");
    }

    #[test]
    fn decode_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(DecodeError::Other("test".to_string()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn warning_code_tags() {
        assert_eq!(
            DecodeWarningCode::UnterminatedLiteral.as_str(),
            "UNTERMINATED_LITERAL"
        );
        assert_eq!(DecodeWarningCode::InvalidCodepoint.as_str(), "INVALID_CODEPOINT");
        assert_eq!(
            DecodeWarningCode::MalformedCMapEntry.as_str(),
            "MALFORMED_CMAP_ENTRY"
        );
        assert_eq!(
            DecodeWarningCode::UnreadableToUnicode.as_str(),
            "UNREADABLE_TOUNICODE"
        );
        assert_eq!(DecodeWarningCode::Other("x".to_string()).as_str(), "OTHER");
    }

    #[test]
    fn warning_new_uses_other_code() {
        let w = DecodeWarning::new("something odd");
        assert_eq!(w.code, DecodeWarningCode::Other("something odd".to_string()));
        assert_eq!(w.description, "something odd");
        assert_eq!(w.offset, None);
        assert_eq!(w.font_name, None);
    }

    #[test]
    fn warning_display_with_context() {
        let w = DecodeWarning::with_code(DecodeWarningCode::UnterminatedLiteral, "no ')'")
            .at_offset(12)
            .for_font("F1");
        assert_eq!(
            w.to_string(),
            "[UNTERMINATED_LITERAL] no ')' [font F1] [offset 12]"
        );
    }

    #[test]
    fn warning_display_without_context() {
        let w = DecodeWarning::with_code(DecodeWarningCode::InvalidCodepoint, "U+D800");
        assert_eq!(w.to_string(), "[INVALID_CODEPOINT] U+D800");
    }

    #[test]
    fn result_ok_is_clean() {
        let r = DecodeResult::ok("text".to_string());
        assert!(r.is_clean());
        assert_eq!(r.value, "text");
    }

    #[test]
    fn result_with_warnings_is_not_clean() {
        let r = DecodeResult::with_warnings(1, vec![DecodeWarning::new("w")]);
        assert!(!r.is_clean());
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn result_map_preserves_warnings() {
        let r = DecodeResult::with_warnings("abc", vec![DecodeWarning::new("w")]);
        let mapped = r.map(str::len);
        assert_eq!(mapped.value, 3);
        assert_eq!(mapped.warnings.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn warning_serde_roundtrip() {
        let w = DecodeWarning::with_code(DecodeWarningCode::MalformedCMapEntry, "bad").at_offset(3);
        let json = serde_json::to_string(&w).unwrap();
        let back: DecodeWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }
}
