//! Integration tests for the fontdecode public API.
//!
//! Test PDFs are created programmatically using lopdf, saved, reloaded, and
//! their fonts decoded through the facade.

use fontdecode::{
    DecodeError, DecodeOptions, DecodeWarningCode, FontTextDecoder, MemoryFont, RawTextFallback,
    UnicodeNorm, decoder_for_page_font, decoder_for_page_font_with_options,
};
use lopdf::{Object, Stream, dictionary};

const TO_UNICODE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<00> <FF>
endcodespacerange
3 beginbfchar
<01> <0048>
<02> <0069>
<03> <00660069>
endbfchar
2 beginbfrange
<10> <19> <0030>
<20> <22> [<0041> <0042> <D83DDE00>]
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

// --- Test PDF creation helpers ---

/// Create a one-page PDF whose page inherits its resources from the page
/// tree root. Fonts:
/// - F1: ToUnicode CMap
/// - F2: Encoding dictionary with Differences
/// - F3: WinAnsiEncoding by name, no ToUnicode
/// - F4: ToUnicode given as a name
/// - F5: WinAnsiEncoding base with Differences
fn pdf_with_fonts() -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let cmap_id = doc.add_object(Stream::new(dictionary! {}, TO_UNICODE.to_vec()));
    let f1 = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Custom",
        "ToUnicode" => Object::Reference(cmap_id),
    });
    let f2 = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Symbols",
        "Encoding" => dictionary! {
            "Type" => "Encoding",
            "Differences" => vec![
                Object::Integer(1),
                Object::Name(b"bullet".to_vec()),
                Object::Name(b"emdash".to_vec()),
            ],
        },
    });
    let f3 = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let f4 = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "Broken",
        "ToUnicode" => "Identity-H",
    });
    let f5 = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
        "Encoding" => dictionary! {
            "Type" => "Encoding",
            "BaseEncoding" => "WinAnsiEncoding",
            "Differences" => vec![Object::Integer(1), Object::Name(b"ntilde".to_vec())],
        },
    });

    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 12 Tf [(\\001\\002)-300(\\003)] TJ ET".to_vec(),
    ));

    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Contents" => Object::Reference(content_id),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(f1),
                    "F2" => Object::Reference(f2),
                    "F3" => Object::Reference(f3),
                    "F4" => Object::Reference(f4),
                    "F5" => Object::Reference(f5),
                },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn load() -> (lopdf::Document, lopdf::ObjectId) {
    let doc = lopdf::Document::load_mem(&pdf_with_fonts()).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    (doc, page_id)
}

// --- ToUnicode ---

#[test]
fn to_unicode_font_decodes_literals() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    assert_eq!(decoder.decode_text(b"[(\\001\\002)-300(\\003)] TJ"), "Hi fi");
}

#[test]
fn to_unicode_font_decodes_ranges() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    assert_eq!(decoder.decode_text(b"(\\020\\021\\031)"), "019");
    assert_eq!(decoder.decode_text(b"( !\")"), "AB\u{1F600}");
}

#[test]
fn to_unicode_font_decodes_hex_strings() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    // two-digit groups are right-padded before lookup, so <01> looks up 0x0100
    assert_eq!(decoder.decode_hexadecimal(b"<0001>-250<0002>"), "H i");
    assert_eq!(decoder.decode_hexadecimal(b"<01>"), "01");
}

#[test]
fn unmapped_codes_pass_through() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    assert_eq!(decoder.decode_text(b"(xyz)"), "xyz");
}

#[test]
fn cmap_is_exposed_after_first_use() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    let cmap = decoder.cmap().unwrap();
    assert!(cmap.contains(0x01));
    assert!(cmap.contains(0x19));
    assert!(!cmap.contains(0x1A));
    assert!(decoder.init_warnings().is_empty());
}

// --- Encoding ---

#[test]
fn differences_encoding_font() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F2").unwrap();
    assert!(decoder.has_encoding());
    assert_eq!(decoder.decode_text(b"(\\001 a \\002)"), "\u{2022} a \u{2014}");
}

#[test]
fn differences_over_win_ansi_base_font() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F5").unwrap();
    assert!(decoder.has_encoding());
    assert_eq!(
        decoder.decode_text(b"(\\223ma\\001ana\\224 \\200)"),
        "\u{201C}ma\u{00F1}ana\u{201D} \u{20AC}"
    );
}

#[test]
fn named_encoding_without_to_unicode_passes_through() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F3").unwrap();
    assert!(!decoder.has_encoding());
    assert!(decoder.cmap().is_none());
    assert_eq!(decoder.decode_text(b"(Hello)-300(World)"), "Hello World");
    assert_eq!(decoder.decode_text(b"(caf\\351)"), "caf\u{00E9}");
}

#[test]
fn windows_1252_fallback() {
    let (doc, page_id) = load();
    let options = DecodeOptions {
        raw_text: RawTextFallback::Windows1252,
        ..DecodeOptions::default()
    };
    let decoder = decoder_for_page_font_with_options(&doc, page_id, "F3", options).unwrap();
    assert_eq!(decoder.decode_text(b"(\\223quoted\\224)"), "\u{201C}quoted\u{201D}");
}

// --- Warnings and errors ---

#[test]
fn unreadable_to_unicode_reports_warning() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F4").unwrap();
    assert_eq!(decoder.decode_text(b"(ab)"), "ab");
    let warnings = decoder.init_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, DecodeWarningCode::UnreadableToUnicode);
    assert_eq!(warnings[0].font_name.as_deref(), Some("F4"));
}

#[test]
fn unterminated_literal_returns_partial_text() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    let result = decoder.decode_text_with_warnings(b"(\\001)-300(\\002");
    assert_eq!(result.value, "H");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].code, DecodeWarningCode::UnterminatedLiteral);
    assert_eq!(
        result.warnings[0].to_string(),
        "[UNTERMINATED_LITERAL] literal string has no closing parenthesis [font F1] [offset 7]"
    );
}

#[test]
fn unknown_font_is_an_error() {
    let (doc, page_id) = load();
    let err = decoder_for_page_font(&doc, page_id, "F9").unwrap_err();
    assert_eq!(err, DecodeError::FontNotFound("F9".to_string()));
}

#[test]
fn bad_page_id_is_an_error() {
    let (doc, _) = load();
    let err = decoder_for_page_font(&doc, (9999, 0), "F1").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidObject(_)));
}

// --- Options ---

#[test]
fn unicode_normalization_option() {
    let (doc, page_id) = load();
    let options = DecodeOptions {
        unicode_norm: UnicodeNorm::Nfd,
        ..DecodeOptions::default()
    };
    let decoder = decoder_for_page_font_with_options(&doc, page_id, "F3", options).unwrap();
    assert_eq!(decoder.decode_text(b"(caf\\351)"), "cafe\u{0301}");
}

// --- Shared decoders ---

#[test]
fn decoder_shared_across_threads() {
    let (doc, page_id) = load();
    let decoder = decoder_for_page_font(&doc, page_id, "F1").unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| decoder.decode_text(b"(\\001\\002)")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Hi");
        }
    });
}

#[test]
fn memory_font_without_document() {
    let font = MemoryFont::new()
        .with_name("Inline")
        .with_to_unicode(TO_UNICODE);
    let decoder = FontTextDecoder::new(font);
    assert_eq!(decoder.decode_text(b"(\\001\\002)"), "Hi");
}
