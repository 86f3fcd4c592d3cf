//! Domain models for PDF signature metadata.
//!
//! Every entity here is scoped to a single extraction call: the scanner
//! produces [`SignatureField`]s, the decoder turns each field's raw bytes
//! into a [`SignedDataContainer`], and the pipeline joins signer infos with
//! their matched certificates into [`ResolvedSignature`]s. Nothing is shared
//! or cached across documents.

use chrono::{DateTime, FixedOffset, Utc};

/// The logical kind of a signature field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    /// An identity signature (`/Type /Sig`).
    Signature,
    /// A document timestamp (`/Type /DocTimeStamp`).
    DocumentTimestamp,
}

impl SignatureKind {
    /// The external name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureKind::Signature => "signature",
            SignatureKind::DocumentTimestamp => "document-timestamp",
        }
    }

    /// Parse a signature dictionary `/Type` name. Unrecognized names yield
    /// `None` and the field is skipped by the scanner.
    pub fn from_pdf_name(name: &[u8]) -> Option<Self> {
        match name {
            b"Sig" => Some(SignatureKind::Signature),
            b"DocTimeStamp" => Some(SignatureKind::DocumentTimestamp),
            _ => None,
        }
    }
}

/// One signature dictionary found in a PDF's form fields.
///
/// Created transiently per document scan and discarded after projection.
#[derive(Debug, Clone)]
pub struct SignatureField {
    /// Whether this is an identity signature or a document timestamp.
    pub kind: SignatureKind,
    /// Raw signature container bytes (`/Contents`), an opaque DER blob.
    pub contents: Vec<u8>,
    /// Declared signature format identifier (`/SubFilter`),
    /// e.g. `ETSI.CAdES.detached` or `adbe.pkcs7.detached`.
    pub sub_filter: Option<String>,
    /// Declared signature handler name (`/Filter`), e.g. `Adobe.PPKLite`.
    pub handler: Option<String>,
    /// Signer-supplied name (`/Name`).
    pub signer_name: Option<String>,
    /// Signer-supplied contact info (`/ContactInfo`).
    pub contact_info: Option<String>,
    /// Signer-supplied location (`/Location`).
    pub location: Option<String>,
    /// PDF-native signing time string (`/M`), unparsed.
    pub signing_time_raw: Option<String>,
}

/// Issuer or subject identity attributes of a certificate.
///
/// Each attribute is absent when the source certificate omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    /// Country name (C).
    pub country: Option<String>,
    /// Organization name (O).
    pub organization: Option<String>,
    /// Organizational unit name (OU).
    pub organizational_unit: Option<String>,
    /// Common name (CN).
    pub common_name: Option<String>,
    /// Locality name (L).
    pub locality: Option<String>,
}

/// One certificate embedded in a signed-data container.
///
/// Owned by its [`SignedDataContainer`] for the duration of one extraction
/// call; never shared across documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Certificate serial number, lowercase hex.
    pub serial_number: String,
    /// Issuer identity attributes.
    pub issuer: DistinguishedName,
    /// Subject identity attributes.
    pub subject: DistinguishedName,
    /// Start of the validity period.
    pub not_before: DateTime<Utc>,
    /// End of the validity period.
    pub not_after: DateTime<Utc>,
    /// Full issuer name in RFC 4514 form, the correlation key used to match
    /// signer identifiers. The flattened `issuer` attributes are lossy.
    pub(crate) issuer_raw: String,
}

/// The (issuer, serial number) pair identifying a signer's certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerId {
    /// Issuer distinguished name in RFC 4514 form.
    pub issuer: String,
    /// Certificate serial number, lowercase hex.
    pub serial_number: String,
}

/// Signed attributes decoded from a signer info.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedAttributes {
    /// Name of the content type the signature covers (e.g. `data`).
    pub content_type: Option<String>,
    /// Signing time asserted by the signer, if present.
    pub signing_time: Option<DateTime<FixedOffset>>,
    /// Message digest over the signed content.
    pub message_digest: Option<Vec<u8>>,
}

/// One signer entry inside a signed-data container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerInfo {
    /// Signer identifier, the correlation key into the certificate set.
    pub sid: SignerId,
    /// Digest algorithm name (e.g. `sha256`).
    pub digest_algorithm: String,
    /// Signature algorithm name (e.g. `rsa`).
    pub signature_algorithm: String,
    /// Raw signature value bytes.
    pub signature: Vec<u8>,
    /// Decoded signed attributes.
    pub signed_attrs: SignedAttributes,
}

/// A decoded CMS signed-data container: the certificate set and signer list
/// of one signature field.
#[derive(Debug, Clone, Default)]
pub struct SignedDataContainer {
    /// Embedded certificates, in container order.
    pub certificates: Vec<Certificate>,
    /// Signer infos, in container order.
    pub signer_infos: Vec<SignerInfo>,
}

/// The join of one signer info with its matched certificate plus field-level
/// metadata. Every resolved signature has exactly one matched certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSignature {
    /// Whether this came from a signature or a timestamp field.
    pub kind: SignatureKind,
    /// The signer entry from the decoded container.
    pub signer: SignerInfo,
    /// The certificate matched to the signer's identifier.
    pub certificate: Certificate,
    /// Signer-supplied name from the field dictionary.
    pub signer_name: Option<String>,
    /// Signer-supplied contact info from the field dictionary.
    pub contact_info: Option<String>,
    /// Signer-supplied location from the field dictionary.
    pub location: Option<String>,
    /// Declared signature format identifier.
    pub sub_filter: Option<String>,
    /// Declared signature handler name.
    pub handler: Option<String>,
    /// Resolved signing time: the field's `/M` string when parseable,
    /// otherwise the signed `signing-time` attribute, otherwise unset.
    pub signing_time: Option<DateTime<FixedOffset>>,
}

impl ResolvedSignature {
    /// The signer's display name: the field's `/Name` entry when present,
    /// falling back to the certificate subject's common name.
    pub fn display_name(&self) -> Option<&str> {
        self.signer_name
            .as_deref()
            .or(self.certificate.subject.common_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_kind_names() {
        assert_eq!(SignatureKind::Signature.as_str(), "signature");
        assert_eq!(SignatureKind::DocumentTimestamp.as_str(), "document-timestamp");
    }

    #[test]
    fn test_signature_kind_from_pdf_name() {
        assert_eq!(SignatureKind::from_pdf_name(b"Sig"), Some(SignatureKind::Signature));
        assert_eq!(
            SignatureKind::from_pdf_name(b"DocTimeStamp"),
            Some(SignatureKind::DocumentTimestamp)
        );
        assert_eq!(SignatureKind::from_pdf_name(b"Widget"), None);
    }

    #[test]
    fn test_distinguished_name_default_is_empty() {
        let dn = DistinguishedName::default();
        assert!(dn.country.is_none());
        assert!(dn.organization.is_none());
        assert!(dn.organizational_unit.is_none());
        assert!(dn.common_name.is_none());
        assert!(dn.locality.is_none());
    }

    fn sample_certificate(subject_cn: Option<&str>) -> Certificate {
        Certificate {
            serial_number: "01".to_string(),
            issuer: DistinguishedName::default(),
            subject: DistinguishedName {
                common_name: subject_cn.map(str::to_string),
                ..Default::default()
            },
            not_before: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            not_after: DateTime::<Utc>::from_timestamp(1, 0).unwrap(),
            issuer_raw: String::new(),
        }
    }

    fn sample_resolved(signer_name: Option<&str>, subject_cn: Option<&str>) -> ResolvedSignature {
        ResolvedSignature {
            kind: SignatureKind::Signature,
            signer: SignerInfo {
                sid: SignerId {
                    issuer: String::new(),
                    serial_number: "01".to_string(),
                },
                digest_algorithm: "sha256".to_string(),
                signature_algorithm: "rsa".to_string(),
                signature: Vec::new(),
                signed_attrs: SignedAttributes::default(),
            },
            certificate: sample_certificate(subject_cn),
            signer_name: signer_name.map(str::to_string),
            contact_info: None,
            location: None,
            sub_filter: None,
            handler: None,
            signing_time: None,
        }
    }

    #[test]
    fn test_display_name_prefers_field_name() {
        let sig = sample_resolved(Some("Field Name"), Some("Cert CN"));
        assert_eq!(sig.display_name(), Some("Field Name"));
    }

    #[test]
    fn test_display_name_falls_back_to_subject_cn() {
        let sig = sample_resolved(None, Some("Cert CN"));
        assert_eq!(sig.display_name(), Some("Cert CN"));
        assert_eq!(sample_resolved(None, None).display_name(), None);
    }
}
