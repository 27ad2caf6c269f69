//! Per-font text decoder with a lazily built translation state.

use std::sync::{Arc, OnceLock};

use fontdecode_core::{
    DecodeOptions, DecodeResult, DecodeWarning, DecodeWarningCode, ENCODING_KEY, EncodingTable,
    FontEntry, FontResource, TO_UNICODE_KEY,
};
use tracing::{debug, warn};

use crate::cmap::CMapTable;
use crate::tokenizer;
use crate::translator::{CharCode, CharacterTranslator};

/// Translation state resolved from a font's entries on first use.
struct FontState {
    encoding: Option<Arc<dyn EncodingTable>>,
    cmap: Option<CMapTable>,
    warnings: Vec<DecodeWarning>,
}

/// Decodes text-showing operands of one font to Unicode.
///
/// The font's `Encoding` and `ToUnicode` entries are read the first time
/// any decode method is called, exactly once, even when the decoder is
/// shared between threads. After that every call is a read-only lookup.
///
/// # Example
///
/// ```
/// use fontdecode_core::MemoryFont;
/// use fontdecode_parse::FontTextDecoder;
///
/// let font = MemoryFont::new().with_to_unicode(&b"beginbfchar\n<01> <0041>\nendbfchar\n"[..]);
/// let decoder = FontTextDecoder::new(font);
/// assert_eq!(decoder.decode_text(b"(\\001)-300(\\001)"), "A A");
/// ```
pub struct FontTextDecoder<F> {
    font: F,
    options: DecodeOptions,
    state: OnceLock<FontState>,
}

impl<F: FontResource> FontTextDecoder<F> {
    /// Create a decoder with default options.
    pub fn new(font: F) -> Self {
        Self::with_options(font, DecodeOptions::default())
    }

    /// Create a decoder with explicit options.
    pub fn with_options(font: F, options: DecodeOptions) -> Self {
        Self {
            font,
            options,
            state: OnceLock::new(),
        }
    }

    /// The wrapped font resource.
    pub fn font(&self) -> &F {
        &self.font
    }

    /// The options this decoder was built with.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the parenthesized literals of a text-showing operand.
    pub fn decode_text(&self, fragment: &[u8]) -> String {
        self.decode_text_with_warnings(fragment).value
    }

    /// Like [`decode_text`](Self::decode_text), also returning the warnings
    /// raised while scanning `fragment`.
    pub fn decode_text_with_warnings(&self, fragment: &[u8]) -> DecodeResult<String> {
        let state = self.state();
        let translator = self.translator(state);
        if !self.options.collect_warnings {
            // scratch buffer, never tagged or returned
            let text = tokenizer::decode_text(
                fragment,
                &translator,
                &self.options.spacing,
                &mut Vec::new(),
            );
            return DecodeResult::ok(self.options.unicode_norm.apply(text));
        }
        let mut warnings = Vec::new();
        let text = tokenizer::decode_text(
            fragment,
            &translator,
            &self.options.spacing,
            &mut warnings,
        );
        self.finish(text, warnings)
    }

    /// Decode the `<hex>` runs of a text-showing operand.
    pub fn decode_hexadecimal(&self, fragment: &[u8]) -> String {
        self.decode_hexadecimal_with_warnings(fragment).value
    }

    /// Like [`decode_hexadecimal`](Self::decode_hexadecimal) with the
    /// warnings of this call. Hex runs never raise any today.
    pub fn decode_hexadecimal_with_warnings(&self, fragment: &[u8]) -> DecodeResult<String> {
        let state = self.state();
        let text = self.translator(state).decode_hexadecimal(fragment);
        self.finish(text, Vec::new())
    }

    /// Translate a single character code through the font's CMap.
    ///
    /// Unmapped codes are returned unchanged. No normalization is applied.
    pub fn translate_char(&self, code: CharCode<'_>) -> String {
        self.translator(self.state()).translate_char(code)
    }

    /// Warnings raised while reading the font's entries.
    pub fn init_warnings(&self) -> &[DecodeWarning] {
        &self.state().warnings
    }

    /// The parsed ToUnicode CMap, or `None` if the font has no `ToUnicode` entry.
    pub fn cmap(&self) -> Option<&CMapTable> {
        self.state().cmap.as_ref()
    }

    /// Whether the font supplied a single-byte encoding table.
    pub fn has_encoding(&self) -> bool {
        self.state().encoding.is_some()
    }

    fn state(&self) -> &FontState {
        self.state.get_or_init(|| self.load_state())
    }

    fn load_state(&self) -> FontState {
        let font_name = self.font.font_name();
        let mut warnings = Vec::new();

        let encoding = match self.font.get(ENCODING_KEY) {
            FontEntry::Encoding(table) => Some(table),
            _ => None,
        };

        let collect = self.options.collect_warnings;

        let cmap = match self.font.get(TO_UNICODE_KEY) {
            FontEntry::Missing => None,
            FontEntry::Stream(data) if !collect => Some(CMapTable::parse(&data)),
            FontEntry::Stream(data) => {
                let parsed = CMapTable::parse_with_warnings(&data);
                warnings.extend(parsed.warnings);
                Some(parsed.value)
            }
            FontEntry::Encoding(_) | FontEntry::Other => {
                warn!(font = ?font_name, "ToUnicode entry is not a readable stream");
                if collect {
                    warnings.push(DecodeWarning::with_code(
                        DecodeWarningCode::UnreadableToUnicode,
                        "ToUnicode entry is not a readable stream, using an empty CMap",
                    ));
                }
                Some(CMapTable::default())
            }
        };

        if let Some(name) = &font_name {
            warnings = warnings.into_iter().map(|w| w.for_font(name.clone())).collect();
        }

        debug!(
            font = ?font_name,
            has_encoding = encoding.is_some(),
            cmap_entries = cmap.as_ref().map_or(0, CMapTable::len),
            "font state initialised"
        );

        FontState {
            encoding,
            cmap,
            warnings,
        }
    }

    fn translator<'s>(&self, state: &'s FontState) -> CharacterTranslator<'s> {
        CharacterTranslator::new(
            state.encoding.as_deref(),
            state.cmap.as_ref(),
            self.options.raw_text,
        )
    }

    fn finish(&self, text: String, warnings: Vec<DecodeWarning>) -> DecodeResult<String> {
        let text = self.options.unicode_norm.apply(text);
        if !self.options.collect_warnings {
            return DecodeResult::ok(text);
        }
        let warnings = match self.font.font_name() {
            Some(name) => warnings
                .into_iter()
                .map(|w| w.for_font(name.clone()))
                .collect(),
            None => warnings,
        };
        DecodeResult::with_warnings(text, warnings)
    }
}

impl<F: std::fmt::Debug> std::fmt::Debug for FontTextDecoder<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontTextDecoder")
            .field("font", &self.font)
            .field("options", &self.options)
            .field("initialised", &self.state.get().is_some())
            .finish()
    }
}
