//! [`FontResource`] over a font dictionary in a lopdf document.

use fontdecode_core::{
    BaseEncoding, DifferencesEncoding, ENCODING_KEY, FontEntry, FontResource, TO_UNICODE_KEY,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::BackendError;

/// Upper bound on `/Parent` hops when looking for inherited resources.
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// A font dictionary borrowed from a lopdf [`Document`](lopdf::Document).
///
/// Entry lookups resolve indirect references. `ToUnicode` streams are
/// decompressed, an `Encoding` dictionary becomes a [`DifferencesEncoding`]
/// seeded from its `/BaseEncoding` (StandardEncoding when absent), and
/// anything else that is present is reported as [`FontEntry::Other`].
#[derive(Clone)]
pub struct LopdfFont<'a> {
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
    name: Option<String>,
}

impl std::fmt::Debug for LopdfFont<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfFont")
            .field("name", &self.name)
            .field("dict", self.dict)
            .finish()
    }
}

impl<'a> LopdfFont<'a> {
    /// Wrap a font dictionary of `doc`.
    pub fn new(doc: &'a lopdf::Document, dict: &'a lopdf::Dictionary) -> Self {
        Self {
            doc,
            dict,
            name: None,
        }
    }

    /// Set the name used to label warnings.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load the font dictionary stored at `id`.
    pub fn from_object(
        doc: &'a lopdf::Document,
        id: lopdf::ObjectId,
    ) -> Result<Self, BackendError> {
        let dict = doc
            .get_object(id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("font object {} {}: {e}", id.0, id.1)))?;
        Ok(Self::new(doc, dict))
    }

    /// Load the font registered as `name` in the `/Font` resources of a
    /// page, following `/Parent` links for inherited resources.
    pub fn from_page_resources(
        doc: &'a lopdf::Document,
        page_id: lopdf::ObjectId,
        name: &str,
    ) -> Result<Self, BackendError> {
        let resources = page_resources(doc, page_id)?
            .ok_or_else(|| BackendError::Font(format!("{name}: page has no /Resources")))?;

        let fonts = resources
            .get(b"Font")
            .map(|obj| resolve_ref(doc, obj))
            .map_err(|_| BackendError::Font(format!("{name}: page has no /Font resources")))?
            .as_dict()
            .map_err(|_| BackendError::Parse("/Font resources is not a dictionary".to_string()))?;

        let dict = fonts
            .get(name.as_bytes())
            .map(|obj| resolve_ref(doc, obj))
            .map_err(|_| BackendError::Font(name.to_string()))?
            .as_dict()
            .map_err(|_| BackendError::Parse(format!("font {name} is not a dictionary")))?;

        Ok(Self::new(doc, dict).with_name(name))
    }

    /// The underlying font dictionary.
    pub fn dictionary(&self) -> &'a lopdf::Dictionary {
        self.dict
    }

    fn to_unicode_entry(&self, obj: &lopdf::Object) -> FontEntry {
        let Ok(stream) = obj.as_stream() else {
            return FontEntry::Other;
        };
        match decode_stream(stream) {
            Ok(data) => FontEntry::Stream(data),
            Err(e) => {
                warn!(font = ?self.name, error = %e, "cannot read ToUnicode stream");
                FontEntry::Other
            }
        }
    }

    fn encoding_entry(&self, obj: &lopdf::Object) -> FontEntry {
        let Ok(enc_dict) = obj.as_dict() else {
            // An encoding given by name is left to the raw text fallback.
            return FontEntry::Other;
        };

        let base = match enc_dict.get(b"BaseEncoding").map(|b| resolve_ref(self.doc, b)) {
            Ok(lopdf::Object::Name(name)) => {
                let name = String::from_utf8_lossy(name);
                BaseEncoding::from_name(&name).unwrap_or_else(|| {
                    debug!(
                        font = ?self.name,
                        base = %name,
                        "unsupported BaseEncoding, using Standard"
                    );
                    BaseEncoding::Standard
                })
            }
            _ => BaseEncoding::Standard,
        };
        let mut table = DifferencesEncoding::from_base(base);

        if let Some(differences) = enc_dict
            .get(b"Differences")
            .ok()
            .map(|d| resolve_ref(self.doc, d))
            .and_then(|d| d.as_array().ok())
        {
            let runs = differences_runs(differences);
            table.apply_named_runs(
                runs.iter()
                    .map(|(code, names)| (*code, names.iter().map(String::as_str))),
            );
        }
        FontEntry::Encoding(Arc::new(table))
    }
}

impl FontResource for LopdfFont<'_> {
    fn get(&self, name: &str) -> FontEntry {
        let obj = match self.dict.get(name.as_bytes()) {
            Ok(obj) => resolve_ref(self.doc, obj),
            Err(_) => return FontEntry::Missing,
        };
        if matches!(obj, lopdf::Object::Null) {
            return FontEntry::Missing;
        }

        match name {
            TO_UNICODE_KEY => self.to_unicode_entry(obj),
            ENCODING_KEY => self.encoding_entry(obj),
            _ => match obj.as_stream() {
                Ok(stream) => decode_stream(stream).map_or(FontEntry::Other, FontEntry::Stream),
                Err(_) => FontEntry::Other,
            },
        }
    }

    fn font_name(&self) -> Option<String> {
        self.name.clone()
    }
}

/// Split a `/Differences` array into `(start code, glyph names)` runs.
///
/// Names before the first code are ignored.
fn differences_runs(arr: &[lopdf::Object]) -> Vec<(u8, Vec<String>)> {
    let mut runs: Vec<(u8, Vec<String>)> = Vec::new();
    // names after an out-of-range start code are dropped with it
    let mut skipping = false;
    for obj in arr {
        match obj {
            lopdf::Object::Integer(i) => match u8::try_from(*i) {
                Ok(code) => {
                    runs.push((code, Vec::new()));
                    skipping = false;
                }
                Err(_) => skipping = true,
            },
            lopdf::Object::Name(name) if !skipping => {
                if let Some((_, names)) = runs.last_mut() {
                    names.push(String::from_utf8_lossy(name).into_owned());
                }
            }
            _ => {}
        }
    }
    runs
}

/// Resolve an indirect reference, returning the referenced object.
/// If the object is not a reference, returns it as-is.
fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Decode a PDF stream, decompressing if necessary.
fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("stream decompression failed: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// The `/Resources` dictionary of a page, inherited through `/Parent`.
fn page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<Option<&lopdf::Dictionary>, BackendError> {
    let mut current_id = page_id;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(resources) = dict.get(b"Resources") {
            return resolve_ref(doc, resources)
                .as_dict()
                .map(Some)
                .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree too deep or cyclic".to_string()))
}
