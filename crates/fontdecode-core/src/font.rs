//! Font resource abstraction.
//!
//! A decoder only needs two things from the surrounding document model:
//! the entries of one font dictionary ([`FontResource`]) and, for simple
//! fonts, a single-byte code translation ([`EncodingTable`]). Both are
//! traits so that any object model can back a decoder.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Font dictionary key holding the simple-font encoding.
pub const ENCODING_KEY: &str = "Encoding";

/// Font dictionary key holding the ToUnicode CMap program.
pub const TO_UNICODE_KEY: &str = "ToUnicode";

/// A single-byte code → Unicode code point translation.
///
/// Implementations are owned by the font resource; decoders only borrow
/// them through an [`Arc`].
pub trait EncodingTable: Send + Sync {
    /// Translate one byte code to a Unicode code point.
    ///
    /// The returned value is not required to be a valid Unicode scalar;
    /// callers handle invalid values without failing.
    fn translate_char(&self, code: u8) -> u32;
}

/// The value of one entry of a font dictionary, as seen by a decoder.
#[derive(Clone)]
pub enum FontEntry {
    /// The key is absent. This is a normal state, not an error.
    Missing,
    /// A stream entry; holds the decoded (decompressed) stream bytes.
    Stream(Vec<u8>),
    /// An encoding entry that resolves to a usable single-byte table.
    Encoding(Arc<dyn EncodingTable>),
    /// The key is present but has no representation a decoder can use
    /// (e.g. an encoding given only by name).
    Other,
}

impl FontEntry {
    /// Returns true for [`FontEntry::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, FontEntry::Missing)
    }

    /// Raw program text of a stream entry, if this is one.
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            FontEntry::Stream(data) => Some(data),
            _ => None,
        }
    }
}

impl fmt::Debug for FontEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontEntry::Missing => f.write_str("Missing"),
            FontEntry::Stream(data) => write!(f, "Stream({} bytes)", data.len()),
            FontEntry::Encoding(_) => f.write_str("Encoding(..)"),
            FontEntry::Other => f.write_str("Other"),
        }
    }
}

/// Read access to the entries of a font dictionary.
pub trait FontResource {
    /// Look up a font dictionary entry by key (e.g. `"ToUnicode"`).
    ///
    /// Absent keys return [`FontEntry::Missing`].
    fn get(&self, name: &str) -> FontEntry;

    /// Name used to label warnings for this font, if known.
    fn font_name(&self) -> Option<String> {
        None
    }
}

impl<T: FontResource + ?Sized> FontResource for &T {
    fn get(&self, name: &str) -> FontEntry {
        (**self).get(name)
    }

    fn font_name(&self) -> Option<String> {
        (**self).font_name()
    }
}

impl<T: FontResource + ?Sized> FontResource for Arc<T> {
    fn get(&self, name: &str) -> FontEntry {
        (**self).get(name)
    }

    fn font_name(&self) -> Option<String> {
        (**self).font_name()
    }
}

/// An in-memory font resource.
///
/// Useful when the font entries come from somewhere other than a parsed
/// document, and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFont {
    name: Option<String>,
    entries: HashMap<String, FontEntry>,
}

impl MemoryFont {
    /// Create an empty font with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name used to label warnings.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the ToUnicode CMap program.
    pub fn with_to_unicode(self, program: impl Into<Vec<u8>>) -> Self {
        self.with_entry(TO_UNICODE_KEY, FontEntry::Stream(program.into()))
    }

    /// Set the single-byte encoding table.
    pub fn with_encoding(self, table: Arc<dyn EncodingTable>) -> Self {
        self.with_entry(ENCODING_KEY, FontEntry::Encoding(table))
    }

    /// Set an arbitrary entry.
    pub fn with_entry(mut self, key: impl Into<String>, entry: FontEntry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }
}

impl FontResource for MemoryFont {
    fn get(&self, name: &str) -> FontEntry {
        self.entries.get(name).cloned().unwrap_or(FontEntry::Missing)
    }

    fn font_name(&self) -> Option<String> {
        self.name.clone()
    }
}
