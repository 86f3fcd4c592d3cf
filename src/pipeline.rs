//! Signature extraction pipeline.
//!
//! Orchestrates the field scanner, container decoder, certificate matcher
//! and timestamp normalizer into a lazy sequence of [`ResolvedSignature`]s.
//! A corrupt container blinds only its own field; a signer that cannot be
//! attributed to a certificate aborts extraction for the whole document.

use std::collections::VecDeque;

use lopdf::Document;

use crate::details::{project, SignatureDetails};
use crate::error::{Error, Result};
use crate::scanner::SignatureScanner;
use crate::types::{ResolvedSignature, SignatureField};
use crate::{cms, matcher, timestamp};

/// Lazy iterator over a document's resolved signatures.
///
/// Yields one `Ok(ResolvedSignature)` per (field, signer) pair in scan
/// order. After the first `Err` the iterator is fused: no signature from a
/// document with an unattributable signer is ever handed out.
pub struct Signatures<'a> {
    scanner: SignatureScanner<'a>,
    /// Signatures resolved from the current field, not yet yielded.
    pending: VecDeque<ResolvedSignature>,
    failed: bool,
}

impl<'a> Signatures<'a> {
    /// Begin extraction over an already-loaded document.
    pub fn new(doc: &'a Document) -> Result<Self> {
        Ok(Self {
            scanner: SignatureScanner::new(doc)?,
            pending: VecDeque::new(),
            failed: false,
        })
    }

    /// Decode one field and queue its resolved signatures.
    ///
    /// Malformed or non-signed-data containers skip the field; a certificate
    /// match failure propagates as a hard error.
    fn resolve_field(&mut self, field: SignatureField) -> Result<()> {
        let container = match cms::decode_signed_data(&field.contents) {
            Ok(Some(container)) => container,
            Ok(None) => {
                log::debug!("field content is not signed-data, skipping");
                return Ok(());
            },
            Err(e) => {
                log::warn!("skipping field with malformed signature container: {e}");
                return Ok(());
            },
        };

        let mut resolved = Vec::with_capacity(container.signer_infos.len());
        for signer in &container.signer_infos {
            let certificate = matcher::find_certificate(&container, signer)?.clone();
            let signing_time = field
                .signing_time_raw
                .as_deref()
                .and_then(timestamp::parse_pdf_date)
                .or(signer.signed_attrs.signing_time);

            resolved.push(ResolvedSignature {
                kind: field.kind,
                signer: signer.clone(),
                certificate,
                signer_name: field.signer_name.clone(),
                contact_info: field.contact_info.clone(),
                location: field.location.clone(),
                sub_filter: field.sub_filter.clone(),
                handler: field.handler.clone(),
                signing_time,
            });
        }
        self.pending.extend(resolved);
        Ok(())
    }
}

impl Iterator for Signatures<'_> {
    type Item = Result<ResolvedSignature>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(sig) = self.pending.pop_front() {
                return Some(Ok(sig));
            }
            let field = self.scanner.next()?;
            if let Err(e) = self.resolve_field(field) {
                self.failed = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Extract all signature metadata from a PDF document's bytes.
///
/// Returns the flattened, serialization-ready records in scan order. A
/// document with zero resolvable signatures yields `Ok` with an empty vector,
/// a distinguished outcome from any decode failure. An unattributable signer
/// fails the whole call with [`Error::CertificateNotFound`].
pub fn extract(document_bytes: &[u8]) -> Result<Vec<SignatureDetails>> {
    let doc = Document::load_mem(document_bytes).map_err(Error::from)?;
    let mut details = Vec::new();
    for resolved in Signatures::new(&doc)? {
        details.push(project(&resolved?));
    }
    Ok(details)
}
