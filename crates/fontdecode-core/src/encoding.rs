//! Single-byte encoding tables: a base encoding plus Differences.
//!
//! [`DifferencesEncoding`] starts from one of the standard PDF base
//! encodings and applies `/Differences` overrides. Codes a base encoding
//! leaves undefined keep their byte value (code N → U+00NN). Glyph names
//! are resolved with [`glyph_name_to_char`], which understands `uniXXXX`,
//! `uXXXX[XX]`, single-character names and the common Adobe glyph names.

use crate::font::EncodingTable;

/// A standard base encoding named by `/BaseEncoding` (or an encoding name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    /// Adobe StandardEncoding, the default for simple fonts.
    #[default]
    Standard,
    /// WinAnsiEncoding (Windows code page 1252).
    WinAnsi,
    /// MacRomanEncoding.
    MacRoman,
}

impl BaseEncoding {
    /// Parse an encoding name such as `WinAnsiEncoding`.
    ///
    /// Returns `None` for names without a table here (e.g. `MacExpertEncoding`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(Self::Standard),
            "WinAnsiEncoding" => Some(Self::WinAnsi),
            "MacRomanEncoding" => Some(Self::MacRoman),
            _ => None,
        }
    }

    fn overrides(self) -> &'static [(u8, &'static str)] {
        match self {
            Self::Standard => STANDARD,
            Self::WinAnsi => WIN_ANSI,
            Self::MacRoman => MAC_ROMAN,
        }
    }
}

/// A 256-entry byte code → code point table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferencesEncoding {
    table: [u32; 256],
}

impl Default for DifferencesEncoding {
    fn default() -> Self {
        Self::identity()
    }
}

impl DifferencesEncoding {
    /// The identity table: every code maps to the code point of equal value.
    pub fn identity() -> Self {
        let mut table = [0u32; 256];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = code as u32;
        }
        Self { table }
    }

    /// The table of a standard base encoding.
    pub fn from_base(base: BaseEncoding) -> Self {
        let mut enc = Self::identity();
        for &(code, name) in base.overrides() {
            if let Some(ch) = glyph_name_to_char(name) {
                enc.table[code as usize] = ch as u32;
            }
        }
        enc
    }

    /// Identity table with `differences` applied.
    pub fn with_differences(differences: &[(u8, char)]) -> Self {
        let mut enc = Self::identity();
        enc.apply_differences(differences);
        enc
    }

    /// Override individual codes.
    pub fn apply_differences(&mut self, differences: &[(u8, char)]) {
        for &(code, ch) in differences {
            self.table[code as usize] = ch as u32;
        }
    }

    /// Apply a Differences array given as `(start code, glyph names)` runs.
    ///
    /// Each run assigns its names to consecutive codes and stops at 255.
    /// Names that cannot be resolved leave the code unchanged but still
    /// consume it.
    pub fn apply_named_runs<'a, I, N>(&mut self, runs: I)
    where
        I: IntoIterator<Item = (u8, N)>,
        N: IntoIterator<Item = &'a str>,
    {
        for (start, names) in runs {
            for (code, name) in (start..=u8::MAX).zip(names) {
                if let Some(ch) = glyph_name_to_char(name) {
                    self.table[code as usize] = ch as u32;
                }
            }
        }
    }
}

impl EncodingTable for DifferencesEncoding {
    fn translate_char(&self, code: u8) -> u32 {
        self.table[code as usize]
    }
}

/// Resolve a glyph name to its Unicode character.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                return char::from_u32(code);
            }
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                return char::from_u32(code);
            }
        }
    }

    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(ch);
    }

    GLYPH_NAMES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

// Adobe glyph names with more than one character, sorted for binary search.
static GLYPH_NAMES: &[(&str, char)] = &[
    ("AE", '\u{00C6}'), ("Aacute", '\u{00C1}'), ("Acircumflex", '\u{00C2}'),
    ("Adieresis", '\u{00C4}'), ("Agrave", '\u{00C0}'), ("Aring", '\u{00C5}'),
    ("Atilde", '\u{00C3}'), ("Ccedilla", '\u{00C7}'), ("Delta", '\u{2206}'),
    ("Eacute", '\u{00C9}'), ("Ecircumflex", '\u{00CA}'), ("Edieresis", '\u{00CB}'),
    ("Egrave", '\u{00C8}'), ("Eth", '\u{00D0}'), ("Euro", '\u{20AC}'), ("Iacute", '\u{00CD}'),
    ("Icircumflex", '\u{00CE}'), ("Idieresis", '\u{00CF}'), ("Igrave", '\u{00CC}'),
    ("Lslash", '\u{0141}'), ("Ntilde", '\u{00D1}'), ("OE", '\u{0152}'), ("Oacute", '\u{00D3}'),
    ("Ocircumflex", '\u{00D4}'), ("Odieresis", '\u{00D6}'), ("Ograve", '\u{00D2}'),
    ("Omega", '\u{2126}'), ("Oslash", '\u{00D8}'), ("Otilde", '\u{00D5}'), ("Scaron", '\u{0160}'),
    ("Thorn", '\u{00DE}'), ("Uacute", '\u{00DA}'), ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'), ("Ugrave", '\u{00D9}'), ("Yacute", '\u{00DD}'),
    ("Ydieresis", '\u{0178}'), ("Zcaron", '\u{017D}'), ("aacute", '\u{00E1}'),
    ("acircumflex", '\u{00E2}'), ("acute", '\u{00B4}'), ("adieresis", '\u{00E4}'),
    ("ae", '\u{00E6}'), ("agrave", '\u{00E0}'), ("ampersand", '&'), ("apple", '\u{F8FF}'),
    ("approxequal", '\u{2248}'), ("aring", '\u{00E5}'), ("asciicircum", '^'), ("asciitilde", '~'),
    ("asterisk", '*'), ("at", '@'), ("atilde", '\u{00E3}'), ("backslash", '\\'), ("bar", '|'),
    ("braceleft", '{'), ("braceright", '}'), ("bracketleft", '['), ("bracketright", ']'),
    ("breve", '\u{02D8}'), ("brokenbar", '\u{00A6}'), ("bullet", '\u{2022}'),
    ("caron", '\u{02C7}'), ("ccedilla", '\u{00E7}'), ("cedilla", '\u{00B8}'), ("cent", '\u{00A2}'),
    ("circumflex", '\u{02C6}'), ("colon", ':'), ("comma", ','), ("copyright", '\u{00A9}'),
    ("currency", '\u{00A4}'), ("dagger", '\u{2020}'), ("daggerdbl", '\u{2021}'),
    ("degree", '\u{00B0}'), ("dieresis", '\u{00A8}'), ("divide", '\u{00F7}'), ("dollar", '$'),
    ("dotaccent", '\u{02D9}'), ("dotlessi", '\u{0131}'), ("eacute", '\u{00E9}'),
    ("ecircumflex", '\u{00EA}'), ("edieresis", '\u{00EB}'), ("egrave", '\u{00E8}'), ("eight", '8'),
    ("ellipsis", '\u{2026}'), ("emdash", '\u{2014}'), ("endash", '\u{2013}'), ("equal", '='),
    ("eth", '\u{00F0}'), ("exclam", '!'), ("exclamdown", '\u{00A1}'), ("fi", '\u{FB01}'),
    ("five", '5'), ("fl", '\u{FB02}'), ("florin", '\u{0192}'), ("four", '4'),
    ("fraction", '\u{2044}'), ("germandbls", '\u{00DF}'), ("grave", '`'), ("greater", '>'),
    ("greaterequal", '\u{2265}'), ("guillemotleft", '\u{00AB}'), ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'), ("guilsinglright", '\u{203A}'), ("hungarumlaut", '\u{02DD}'),
    ("hyphen", '-'), ("iacute", '\u{00ED}'), ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'), ("igrave", '\u{00EC}'), ("infinity", '\u{221E}'),
    ("integral", '\u{222B}'), ("less", '<'), ("lessequal", '\u{2264}'), ("logicalnot", '\u{00AC}'),
    ("lozenge", '\u{25CA}'), ("lslash", '\u{0142}'), ("macron", '\u{00AF}'), ("minus", '\u{2212}'),
    ("mu", '\u{00B5}'), ("multiply", '\u{00D7}'), ("nbspace", '\u{00A0}'), ("nine", '9'),
    ("notequal", '\u{2260}'), ("ntilde", '\u{00F1}'), ("numbersign", '#'), ("oacute", '\u{00F3}'),
    ("ocircumflex", '\u{00F4}'), ("odieresis", '\u{00F6}'), ("oe", '\u{0153}'),
    ("ogonek", '\u{02DB}'), ("ograve", '\u{00F2}'), ("one", '1'), ("onehalf", '\u{00BD}'),
    ("onequarter", '\u{00BC}'), ("onesuperior", '\u{00B9}'), ("ordfeminine", '\u{00AA}'),
    ("ordmasculine", '\u{00BA}'), ("oslash", '\u{00F8}'), ("otilde", '\u{00F5}'),
    ("paragraph", '\u{00B6}'), ("parenleft", '('), ("parenright", ')'),
    ("partialdiff", '\u{2202}'), ("percent", '%'), ("period", '.'), ("periodcentered", '\u{00B7}'),
    ("perthousand", '\u{2030}'), ("pi", '\u{03C0}'), ("plus", '+'), ("plusminus", '\u{00B1}'),
    ("product", '\u{220F}'), ("question", '?'), ("questiondown", '\u{00BF}'), ("quotedbl", '"'),
    ("quotedblbase", '\u{201E}'), ("quotedblleft", '\u{201C}'), ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'), ("quoteright", '\u{2019}'), ("quotesinglbase", '\u{201A}'),
    ("quotesingle", '\''), ("radical", '\u{221A}'), ("registered", '\u{00AE}'),
    ("ring", '\u{02DA}'), ("scaron", '\u{0161}'), ("section", '\u{00A7}'), ("semicolon", ';'),
    ("seven", '7'), ("six", '6'), ("slash", '/'), ("space", ' '), ("sterling", '\u{00A3}'),
    ("summation", '\u{2211}'), ("thorn", '\u{00FE}'), ("three", '3'),
    ("threequarters", '\u{00BE}'), ("threesuperior", '\u{00B3}'), ("tilde", '\u{02DC}'),
    ("trademark", '\u{2122}'), ("two", '2'), ("twosuperior", '\u{00B2}'), ("uacute", '\u{00FA}'),
    ("ucircumflex", '\u{00FB}'), ("udieresis", '\u{00FC}'), ("ugrave", '\u{00F9}'),
    ("underscore", '_'), ("yacute", '\u{00FD}'), ("ydieresis", '\u{00FF}'), ("yen", '\u{00A5}'),
    ("zcaron", '\u{017E}'), ("zero", '0'),
];

/// WinAnsiEncoding codes that differ from Latin-1.
static WIN_ANSI: &[(u8, &str)] = &[
    (0x80, "Euro"), (0x82, "quotesinglbase"), (0x83, "florin"), (0x84, "quotedblbase"),
    (0x85, "ellipsis"), (0x86, "dagger"), (0x87, "daggerdbl"), (0x88, "circumflex"),
    (0x89, "perthousand"), (0x8A, "Scaron"), (0x8B, "guilsinglleft"), (0x8C, "OE"),
    (0x8E, "Zcaron"), (0x91, "quoteleft"), (0x92, "quoteright"), (0x93, "quotedblleft"),
    (0x94, "quotedblright"), (0x95, "bullet"), (0x96, "endash"), (0x97, "emdash"), (0x98, "tilde"),
    (0x99, "trademark"), (0x9A, "scaron"), (0x9B, "guilsinglright"), (0x9C, "oe"),
    (0x9E, "zcaron"), (0x9F, "Ydieresis"),
];

/// MacRomanEncoding codes that differ from Latin-1.
static MAC_ROMAN: &[(u8, &str)] = &[
    (0x80, "Adieresis"), (0x81, "Aring"), (0x82, "Ccedilla"), (0x83, "Eacute"), (0x84, "Ntilde"),
    (0x85, "Odieresis"), (0x86, "Udieresis"), (0x87, "aacute"), (0x88, "agrave"),
    (0x89, "acircumflex"), (0x8A, "adieresis"), (0x8B, "atilde"), (0x8C, "aring"),
    (0x8D, "ccedilla"), (0x8E, "eacute"), (0x8F, "egrave"), (0x90, "ecircumflex"),
    (0x91, "edieresis"), (0x92, "iacute"), (0x93, "igrave"), (0x94, "icircumflex"),
    (0x95, "idieresis"), (0x96, "ntilde"), (0x97, "oacute"), (0x98, "ograve"),
    (0x99, "ocircumflex"), (0x9A, "odieresis"), (0x9B, "otilde"), (0x9C, "uacute"),
    (0x9D, "ugrave"), (0x9E, "ucircumflex"), (0x9F, "udieresis"), (0xA0, "dagger"),
    (0xA1, "degree"), (0xA4, "section"), (0xA5, "bullet"), (0xA6, "paragraph"),
    (0xA7, "germandbls"), (0xA8, "registered"), (0xAA, "trademark"), (0xAB, "acute"),
    (0xAC, "dieresis"), (0xAD, "notequal"), (0xAE, "AE"), (0xAF, "Oslash"), (0xB0, "infinity"),
    (0xB2, "lessequal"), (0xB3, "greaterequal"), (0xB4, "yen"), (0xB6, "partialdiff"),
    (0xB7, "summation"), (0xB8, "product"), (0xB9, "pi"), (0xBA, "integral"),
    (0xBB, "ordfeminine"), (0xBC, "ordmasculine"), (0xBD, "Omega"), (0xBE, "ae"), (0xBF, "oslash"),
    (0xC0, "questiondown"), (0xC1, "exclamdown"), (0xC2, "logicalnot"), (0xC3, "radical"),
    (0xC4, "florin"), (0xC5, "approxequal"), (0xC6, "Delta"), (0xC7, "guillemotleft"),
    (0xC8, "guillemotright"), (0xC9, "ellipsis"), (0xCA, "nbspace"), (0xCB, "Agrave"),
    (0xCC, "Atilde"), (0xCD, "Otilde"), (0xCE, "OE"), (0xCF, "oe"), (0xD0, "endash"),
    (0xD1, "emdash"), (0xD2, "quotedblleft"), (0xD3, "quotedblright"), (0xD4, "quoteleft"),
    (0xD5, "quoteright"), (0xD6, "divide"), (0xD7, "lozenge"), (0xD8, "ydieresis"),
    (0xD9, "Ydieresis"), (0xDA, "fraction"), (0xDB, "Euro"), (0xDC, "guilsinglleft"),
    (0xDD, "guilsinglright"), (0xDE, "fi"), (0xDF, "fl"), (0xE0, "daggerdbl"),
    (0xE1, "periodcentered"), (0xE2, "quotesinglbase"), (0xE3, "quotedblbase"),
    (0xE4, "perthousand"), (0xE5, "Acircumflex"), (0xE6, "Ecircumflex"), (0xE7, "Aacute"),
    (0xE8, "Edieresis"), (0xE9, "Egrave"), (0xEA, "Iacute"), (0xEB, "Icircumflex"),
    (0xEC, "Idieresis"), (0xED, "Igrave"), (0xEE, "Oacute"), (0xEF, "Ocircumflex"),
    (0xF0, "apple"), (0xF1, "Ograve"), (0xF2, "Uacute"), (0xF3, "Ucircumflex"), (0xF4, "Ugrave"),
    (0xF5, "dotlessi"), (0xF6, "circumflex"), (0xF7, "tilde"), (0xF8, "macron"), (0xF9, "breve"),
    (0xFA, "dotaccent"), (0xFB, "ring"), (0xFC, "cedilla"), (0xFD, "hungarumlaut"),
    (0xFE, "ogonek"), (0xFF, "caron"),
];

/// StandardEncoding codes that differ from Latin-1.
static STANDARD: &[(u8, &str)] = &[
    (0x27, "quoteright"), (0x60, "quoteleft"), (0xA4, "fraction"), (0xA6, "florin"),
    (0xA8, "currency"), (0xA9, "quotesingle"), (0xAA, "quotedblleft"), (0xAC, "guilsinglleft"),
    (0xAD, "guilsinglright"), (0xAE, "fi"), (0xAF, "fl"), (0xB1, "endash"), (0xB2, "dagger"),
    (0xB3, "daggerdbl"), (0xB4, "periodcentered"), (0xB7, "bullet"), (0xB8, "quotesinglbase"),
    (0xB9, "quotedblbase"), (0xBA, "quotedblright"), (0xBC, "ellipsis"), (0xBD, "perthousand"),
    (0xC1, "grave"), (0xC2, "acute"), (0xC3, "circumflex"), (0xC4, "tilde"), (0xC5, "macron"),
    (0xC6, "breve"), (0xC7, "dotaccent"), (0xC8, "dieresis"), (0xCA, "ring"), (0xCB, "cedilla"),
    (0xCD, "hungarumlaut"), (0xCE, "ogonek"), (0xCF, "caron"), (0xD0, "emdash"), (0xE1, "AE"),
    (0xE3, "ordfeminine"), (0xE8, "Lslash"), (0xE9, "Oslash"), (0xEA, "OE"),
    (0xEB, "ordmasculine"), (0xF1, "ae"), (0xF5, "dotlessi"), (0xF8, "lslash"), (0xF9, "oslash"),
    (0xFA, "oe"), (0xFB, "germandbls"),
];
