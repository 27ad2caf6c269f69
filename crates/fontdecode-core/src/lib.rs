//! fontdecode-core: backend-independent types for font text decoding.
//!
//! This crate defines the narrow capabilities a decoder consumes from the
//! surrounding document model ([`FontResource`], [`EncodingTable`]), the
//! decoding options, and the warning/error types. It knows nothing about
//! CMap syntax or content streams; see fontdecode-parse for that.

pub mod encoding;
pub mod error;
pub mod font;
pub mod options;
pub mod unicode_norm;

pub use encoding::{BaseEncoding, DifferencesEncoding, glyph_name_to_char};
pub use error::{DecodeError, DecodeResult, DecodeWarning, DecodeWarningCode};
pub use font::{ENCODING_KEY, EncodingTable, FontEntry, FontResource, MemoryFont, TO_UNICODE_KEY};
pub use options::{DecodeOptions, RawTextFallback, SpacingHeuristic};
pub use unicode_norm::UnicodeNorm;
