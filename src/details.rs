//! Attribute projection into the external record.
//!
//! [`SignatureDetails`] is the flat, serialization-ready shape consumers see.
//! Every optional attribute is always present in the serialized form and
//! absent values serialize as `null`, never as missing keys, so the record
//! shape is stable regardless of what a particular signature carries.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ResolvedSignature;

/// Issuer identity attributes of the signing certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDetails {
    /// Issuer country name (C).
    pub country_name: Option<String>,
    /// Issuer organization name (O).
    pub organization_name: Option<String>,
    /// Issuer common name (CN).
    pub common_name: Option<String>,
}

/// Subject identity attributes of the signing certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDetails {
    /// Subject country name (C).
    pub country_name: Option<String>,
    /// Subject organization name (O).
    pub organization_name: Option<String>,
    /// Subject organizational unit name (OU).
    pub organizational_unit_name: Option<String>,
    /// Subject common name (CN).
    pub common_name: Option<String>,
    /// Subject locality name (L).
    pub locality_name: Option<String>,
}

/// The flattened projection of one resolved signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureDetails {
    /// Digest algorithm name, e.g. `sha256`.
    pub digest_algorithm: Option<String>,
    /// Signature algorithm name, e.g. `rsassa_pkcs1v15`.
    pub signature_algorithm: Option<String>,
    /// Name of the signed content type, e.g. `data`.
    pub content_type: Option<String>,
    /// `signature` or `document-timestamp`. The only mandatory field.
    #[serde(rename = "type")]
    pub kind: String,
    /// Signer-supplied contact info.
    pub signer_contact_info: Option<String>,
    /// Signer-supplied location.
    pub signer_location: Option<String>,
    /// Resolved signing time.
    pub signing_time: Option<DateTime<FixedOffset>>,
    /// Declared signature format identifier (`/SubFilter`).
    pub signature_type: Option<String>,
    /// Declared signature handler (`/Filter`).
    pub signature_handler: Option<String>,
    /// Start of the certificate validity period.
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the certificate validity period.
    pub valid_to: Option<DateTime<Utc>>,
    /// Certificate issuer identity.
    pub issuer: IssuerDetails,
    /// Certificate subject identity.
    pub subject: SubjectDetails,
}

/// Flatten a resolved signature into its external record.
///
/// Pure function: equal inputs yield identical output.
pub fn project(sig: &ResolvedSignature) -> SignatureDetails {
    let cert = &sig.certificate;
    SignatureDetails {
        digest_algorithm: Some(sig.signer.digest_algorithm.clone()),
        signature_algorithm: Some(sig.signer.signature_algorithm.clone()),
        content_type: sig.signer.signed_attrs.content_type.clone(),
        kind: sig.kind.as_str().to_string(),
        signer_contact_info: sig.contact_info.clone(),
        signer_location: sig.location.clone(),
        signing_time: sig.signing_time,
        signature_type: sig.sub_filter.clone(),
        signature_handler: sig.handler.clone(),
        valid_from: Some(cert.not_before),
        valid_to: Some(cert.not_after),
        issuer: IssuerDetails {
            country_name: cert.issuer.country.clone(),
            organization_name: cert.issuer.organization.clone(),
            common_name: cert.issuer.common_name.clone(),
        },
        subject: SubjectDetails {
            country_name: cert.subject.country.clone(),
            organization_name: cert.subject.organization.clone(),
            organizational_unit_name: cert.subject.organizational_unit.clone(),
            common_name: cert.subject.common_name.clone(),
            locality_name: cert.subject.locality.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Certificate, DistinguishedName, SignatureKind, SignedAttributes, SignerId, SignerInfo,
    };

    fn sample_resolved() -> ResolvedSignature {
        ResolvedSignature {
            kind: SignatureKind::Signature,
            signer: SignerInfo {
                sid: SignerId {
                    issuer: "CN=Example CA".to_string(),
                    serial_number: "0102".to_string(),
                },
                digest_algorithm: "sha256".to_string(),
                signature_algorithm: "sha256_rsa".to_string(),
                signature: vec![0xAA; 4],
                signed_attrs: SignedAttributes {
                    content_type: Some("data".to_string()),
                    signing_time: None,
                    message_digest: Some(vec![0x01; 32]),
                },
            },
            certificate: Certificate {
                serial_number: "0102".to_string(),
                issuer: DistinguishedName {
                    country: Some("FI".to_string()),
                    organization: Some("Example CA Oy".to_string()),
                    common_name: Some("Example CA".to_string()),
                    ..Default::default()
                },
                subject: DistinguishedName {
                    country: Some("FI".to_string()),
                    organization: Some("Example Corp".to_string()),
                    organizational_unit: Some("Billing".to_string()),
                    common_name: Some("Jane Signer".to_string()),
                    locality: Some("Helsinki".to_string()),
                },
                not_before: DateTime::<Utc>::from_timestamp(1_577_836_800, 0).unwrap(),
                not_after: DateTime::<Utc>::from_timestamp(1_893_456_000, 0).unwrap(),
                issuer_raw: "CN=Example CA".to_string(),
            },
            signer_name: Some("Jane Signer".to_string()),
            contact_info: Some("jane@example.com".to_string()),
            location: Some("Helsinki".to_string()),
            sub_filter: Some("ETSI.CAdES.detached".to_string()),
            handler: Some("Adobe.PPKLite".to_string()),
            signing_time: crate::timestamp::parse_pdf_date("D:20230615120000+05'30'"),
        }
    }

    #[test]
    fn test_projection_flattens_all_attributes() {
        let details = project(&sample_resolved());
        assert_eq!(details.kind, "signature");
        assert_eq!(details.digest_algorithm.as_deref(), Some("sha256"));
        assert_eq!(details.signature_algorithm.as_deref(), Some("sha256_rsa"));
        assert_eq!(details.content_type.as_deref(), Some("data"));
        assert_eq!(details.signature_type.as_deref(), Some("ETSI.CAdES.detached"));
        assert_eq!(details.signature_handler.as_deref(), Some("Adobe.PPKLite"));
        assert_eq!(details.issuer.common_name.as_deref(), Some("Example CA"));
        assert_eq!(details.subject.organizational_unit_name.as_deref(), Some("Billing"));
        assert_eq!(details.subject.locality_name.as_deref(), Some("Helsinki"));
        assert!(details.valid_from.unwrap() < details.valid_to.unwrap());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let resolved = sample_resolved();
        let first = serde_json::to_vec(&project(&resolved)).unwrap();
        let second = serde_json::to_vec(&project(&resolved)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_values_serialize_as_null_keys() {
        let mut resolved = sample_resolved();
        resolved.contact_info = None;
        resolved.signing_time = None;
        resolved.certificate.subject.locality = None;

        let json: serde_json::Value = serde_json::to_value(project(&resolved)).unwrap();
        assert!(json.get("signer_contact_info").unwrap().is_null());
        assert!(json.get("signing_time").unwrap().is_null());
        assert!(json["subject"].get("locality_name").unwrap().is_null());
        // The mandatory field and the nested objects are always present.
        assert_eq!(json["type"], "signature");
        assert!(json["issuer"].is_object());
    }

    #[test]
    fn test_serialized_shape_is_exhaustive() {
        let json: serde_json::Value = serde_json::to_value(project(&sample_resolved())).unwrap();
        let top = json.as_object().unwrap();
        for key in [
            "digest_algorithm",
            "signature_algorithm",
            "content_type",
            "type",
            "signer_contact_info",
            "signer_location",
            "signing_time",
            "signature_type",
            "signature_handler",
            "valid_from",
            "valid_to",
            "issuer",
            "subject",
        ] {
            assert!(top.contains_key(key), "missing key {key}");
        }
        assert_eq!(top.len(), 13);

        let subject = json["subject"].as_object().unwrap();
        assert_eq!(subject.len(), 5);
        let issuer = json["issuer"].as_object().unwrap();
        assert_eq!(issuer.len(), 3);
    }
}
