//! Signature field discovery.
//!
//! Walks a PDF's AcroForm field tree and yields one [`SignatureField`] per
//! form field of type `/Sig`, carrying the raw signature container bytes and
//! the field's PDF-native metadata. A document with no AcroForm or no
//! signature fields yields an empty sequence; a field missing its `/Contents`
//! entry is skipped with a warning so the remaining fields stay extractable.

use std::collections::VecDeque;

use lopdf::{Dictionary, Document, Object};

use crate::error::Result;
use crate::types::{SignatureField, SignatureKind};

/// Lazy, finite, non-restartable iterator over a document's signature fields.
pub struct SignatureScanner<'a> {
    doc: &'a Document,
    /// Unvisited entries of the AcroForm field tree, in document order.
    queue: VecDeque<Object>,
}

impl<'a> SignatureScanner<'a> {
    /// Set up a scan over the document's AcroForm fields.
    ///
    /// Fails only when the document has no readable catalog; an absent
    /// AcroForm is an empty scan, not an error.
    pub fn new(doc: &'a Document) -> Result<Self> {
        let catalog = doc.catalog()?;
        let mut queue = VecDeque::new();
        if let Ok(acro_obj) = catalog.get(b"AcroForm") {
            if let Ok(acro) = resolve_dict(doc, acro_obj) {
                if let Ok(fields) = acro.get(b"Fields").and_then(Object::as_array) {
                    queue.extend(fields.iter().cloned());
                }
            }
        }
        Ok(Self { doc, queue })
    }

    /// Read one field-tree entry; `Ok(None)` means "not a usable signature
    /// field, move on".
    fn read_field(&mut self, entry: &Object) -> Result<Option<SignatureField>> {
        let field = resolve_dict(self.doc, entry)?;

        match field.get(b"FT").and_then(Object::as_name) {
            Err(_) => {
                // Non-terminal node: descend into its kids.
                if let Ok(kids) = field.get(b"Kids").and_then(Object::as_array) {
                    self.queue.extend(kids.iter().cloned());
                }
                return Ok(None);
            },
            Ok(name) if name != b"Sig".as_slice() => return Ok(None),
            Ok(_) => {},
        }

        let Ok(value) = field.get(b"V").and_then(|v| resolve_dict(self.doc, v)) else {
            // Unsigned signature field.
            return Ok(None);
        };

        // `/Type` is usually present; a signature dictionary reached through
        // an FT /Sig field without it is treated as a plain signature.
        let kind = match value.get(b"Type").and_then(Object::as_name) {
            Ok(name) => match SignatureKind::from_pdf_name(name) {
                Some(kind) => kind,
                None => return Ok(None),
            },
            Err(_) => SignatureKind::Signature,
        };

        let Ok(contents) = value.get(b"Contents").and_then(Object::as_str) else {
            log::warn!("signature field has no /Contents entry, skipping");
            return Ok(None);
        };

        Ok(Some(SignatureField {
            kind,
            contents: contents.to_vec(),
            sub_filter: dict_name(value, b"SubFilter"),
            handler: dict_name(value, b"Filter"),
            signer_name: dict_string(value, b"Name"),
            contact_info: dict_string(value, b"ContactInfo"),
            location: dict_string(value, b"Location"),
            signing_time_raw: dict_string(value, b"M"),
        }))
    }
}

impl Iterator for SignatureScanner<'_> {
    type Item = SignatureField;

    fn next(&mut self) -> Option<SignatureField> {
        loop {
            let entry = self.queue.pop_front()?;
            match self.read_field(&entry) {
                Ok(Some(field)) => return Some(field),
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("skipping unreadable form field: {e}");
                    continue;
                },
            }
        }
    }
}

/// Follow references until a dictionary is reached.
fn resolve_dict<'a>(doc: &'a Document, mut obj: &'a Object) -> lopdf::Result<&'a Dictionary> {
    // Reference chains deeper than this are not produced by real writers.
    for _ in 0..8 {
        match obj {
            Object::Reference(id) => obj = doc.get_object(*id)?,
            _ => break,
        }
    }
    obj.as_dict()
}

/// Extract a name entry as text, e.g. `/SubFilter /ETSI.CAdES.detached`.
fn dict_name(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|v| v.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .filter(|s| !s.is_empty())
}

/// Extract a string entry as text, decoding UTF-16BE text strings.
fn dict_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|v| v.as_str().ok())
        .map(pdf_text_string)
        .filter(|s| !s.is_empty())
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, else treated as
/// (mostly ASCII) PDFDocEncoding.
fn pdf_text_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
