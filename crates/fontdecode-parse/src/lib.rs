//! fontdecode-parse: ToUnicode CMap parsing and text-operand decoding.
//!
//! This crate turns the string operands of PDF text-showing operators
//! (`Tj`, `TJ`, `'`, `"`) into Unicode for a single font. It builds on
//! fontdecode-core for the font capability traits and option types, and
//! provides a [`FontResource`](fontdecode_core::FontResource) backed by
//! lopdf documents.

pub mod cmap;
pub mod decoder;
pub mod error;
pub mod escape;
pub mod lopdf_font;
pub mod tokenizer;
pub mod translator;

pub use cmap::{CMapRange, CMapTable};
pub use decoder::FontTextDecoder;
pub use error::BackendError;
pub use escape::{decode_octal, unescape_literal};
pub use fontdecode_core;
pub use lopdf_font::LopdfFont;
pub use tokenizer::decode_text;
pub use translator::{CharCode, CharacterTranslator, bytes_to_text};
