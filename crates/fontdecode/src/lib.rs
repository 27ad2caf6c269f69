//! fontdecode: decode PDF text-showing operands to Unicode, one font at a time.
//!
//! This is the public API facade. It re-exports the types of fontdecode-core
//! and the decoder of fontdecode-parse, and adds helpers for looking fonts
//! up in a lopdf document.
//!
//! # Architecture
//!
//! - **fontdecode-core**: font capability traits, options, warnings and errors
//! - **fontdecode-parse**: CMap parsing, escape handling, tokenizing and the lopdf font adapter
//! - **fontdecode** (this crate): public API that ties everything together
//!
//! # Example
//!
//! ```
//! use fontdecode::{FontTextDecoder, MemoryFont};
//!
//! let font = MemoryFont::new().with_to_unicode(&b"beginbfrange\n<20> <7E> <0020>\nendbfrange\n"[..]);
//! let decoder = FontTextDecoder::new(font);
//! assert_eq!(decoder.decode_text(b"[(Hello)-300(World)] TJ"), "Hello World");
//! ```

pub use fontdecode_core;
pub use fontdecode_parse;

pub use fontdecode_core::{
    BaseEncoding, DecodeError, DecodeOptions, DecodeResult, DecodeWarning, DecodeWarningCode,
    DifferencesEncoding, ENCODING_KEY, EncodingTable, FontEntry, FontResource, MemoryFont,
    RawTextFallback, SpacingHeuristic, TO_UNICODE_KEY, UnicodeNorm, glyph_name_to_char,
};
pub use fontdecode_parse::{
    BackendError, CMapRange, CMapTable, CharCode, CharacterTranslator, FontTextDecoder, LopdfFont,
};

/// Build a decoder for the font registered as `name` in a page's resources.
///
/// Resources inherited from parent page-tree nodes are honoured.
pub fn decoder_for_page_font<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    name: &str,
) -> Result<FontTextDecoder<LopdfFont<'a>>, DecodeError> {
    decoder_for_page_font_with_options(doc, page_id, name, DecodeOptions::default())
}

/// Like [`decoder_for_page_font`] with explicit options.
pub fn decoder_for_page_font_with_options<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    name: &str,
    options: DecodeOptions,
) -> Result<FontTextDecoder<LopdfFont<'a>>, DecodeError> {
    let font = LopdfFont::from_page_resources(doc, page_id, name)?;
    Ok(FontTextDecoder::with_options(font, options))
}
