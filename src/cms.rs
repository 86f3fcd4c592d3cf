//! CMS/PKCS#7 container decoding.
//!
//! Decodes the DER-encoded signed-data container extracted from a signature
//! field into a certificate set and a signer-info list. Algorithm and content
//! type identifiers are surfaced as canonical names derived from their dotted
//! OIDs; downstream consumers never see raw OID encodings.
//!
//! Cryptographic verification of the signature bytes is out of scope here;
//! this module only decodes structure and identity.

use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::{SignedData, SignerIdentifier};
use der::asn1::{
    Any, GeneralizedTime, Ia5StringRef, ObjectIdentifier, OctetString, PrintableStringRef,
    TeletexStringRef, UtcTime, Utf8StringRef,
};
use der::{Decode, Encode, SliceReader};
use x509_cert::name::Name;
use x509_cert::time::Time;

use crate::error::{Error, Result};
use crate::types::{
    Certificate, DistinguishedName, SignedAttributes, SignedDataContainer, SignerId, SignerInfo,
};
use chrono::{DateTime, FixedOffset, Utc};

/// CMS signed-data content type (1.2.840.113549.1.7.2).
const OID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");

/// PKCS#9 content-type signed attribute (1.2.840.113549.1.9.3).
const OID_ATTR_CONTENT_TYPE: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.3");
/// PKCS#9 message-digest signed attribute (1.2.840.113549.1.9.4).
const OID_ATTR_MESSAGE_DIGEST: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.4");
/// PKCS#9 signing-time signed attribute (1.2.840.113549.1.9.5).
const OID_ATTR_SIGNING_TIME: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.5");

// X.500 attribute types used for issuer/subject identity.
const OID_AT_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const OID_AT_COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const OID_AT_LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const OID_AT_ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const OID_AT_ORG_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Decode a DER-encoded CMS container into certificates and signer infos.
///
/// Returns `Ok(None)` when the container is well-formed DER but its top-level
/// content type is not signed-data: that is unsupported rather than corrupt
/// content, and the pipeline skips the field without error. Bytes that are
/// not well-formed DER fail with [`Error::MalformedContainer`].
pub fn decode_signed_data(raw: &[u8]) -> Result<Option<SignedDataContainer>> {
    // Signature dictionaries zero-pad /Contents to a reserved size, so the
    // container must be read without insisting the buffer is exhausted.
    let mut reader = SliceReader::new(raw)
        .map_err(|e| Error::MalformedContainer(format!("container too large: {e}")))?;
    let content_info = ContentInfo::decode(&mut reader)
        .map_err(|e| Error::MalformedContainer(format!("not a valid ContentInfo: {e}")))?;

    if content_info.content_type != OID_SIGNED_DATA {
        log::debug!(
            "container content type is {} rather than signed-data",
            content_info.content_type
        );
        return Ok(None);
    }

    let signed_data_der = content_info
        .content
        .to_der()
        .map_err(|e| Error::MalformedContainer(format!("cannot re-encode content: {e}")))?;
    let signed_data = SignedData::from_der(&signed_data_der)
        .map_err(|e| Error::MalformedContainer(format!("not a valid SignedData: {e}")))?;

    let mut certificates = Vec::new();
    if let Some(cert_set) = &signed_data.certificates {
        for choice in cert_set.0.iter() {
            match choice {
                CertificateChoices::Certificate(cert) => {
                    certificates.push(convert_certificate(cert)?);
                },
                CertificateChoices::Other(_) => {
                    // Attribute certificates and the like carry no signer identity.
                    log::debug!("skipping non-X.509 entry in certificate set");
                },
            }
        }
    }

    let signer_infos = signed_data
        .signer_infos
        .0
        .iter()
        .map(convert_signer_info)
        .collect();

    Ok(Some(SignedDataContainer {
        certificates,
        signer_infos,
    }))
}

/// Flatten one X.509 certificate into the domain model.
fn convert_certificate(cert: &x509_cert::Certificate) -> Result<Certificate> {
    let tbs = &cert.tbs_certificate;
    let not_before = der_time_to_utc(&tbs.validity.not_before).ok_or_else(|| {
        Error::MalformedContainer("certificate not-before date out of range".to_string())
    })?;
    let not_after = der_time_to_utc(&tbs.validity.not_after).ok_or_else(|| {
        Error::MalformedContainer("certificate not-after date out of range".to_string())
    })?;

    Ok(Certificate {
        serial_number: hex::encode(tbs.serial_number.as_bytes()),
        issuer: distinguished_name(&tbs.issuer),
        subject: distinguished_name(&tbs.subject),
        not_before,
        not_after,
        issuer_raw: tbs.issuer.to_string(),
    })
}

fn convert_signer_info(signer: &cms::signed_data::SignerInfo) -> SignerInfo {
    let sid = match &signer.sid {
        SignerIdentifier::IssuerAndSerialNumber(isn) => SignerId {
            issuer: isn.issuer.to_string(),
            serial_number: hex::encode(isn.serial_number.as_bytes()),
        },
        SignerIdentifier::SubjectKeyIdentifier(ski) => {
            // No issuer+serial to correlate on; the matcher will report this
            // signer as unattributable.
            let ski_hex = hex::encode(ski.0.as_bytes());
            SignerId {
                issuer: format!("SubjectKeyIdentifier: {ski_hex}"),
                serial_number: ski_hex,
            }
        },
    };

    let mut signed_attrs = SignedAttributes::default();
    if let Some(attrs) = &signer.signed_attrs {
        for attr in attrs.iter() {
            let Some(value) = attr.values.iter().next() else {
                continue;
            };
            if attr.oid == OID_ATTR_CONTENT_TYPE {
                if let Ok(oid) = value.decode_as::<ObjectIdentifier>() {
                    signed_attrs.content_type = Some(oid_name(&oid));
                }
            } else if attr.oid == OID_ATTR_SIGNING_TIME {
                signed_attrs.signing_time = decode_time_attribute(value);
            } else if attr.oid == OID_ATTR_MESSAGE_DIGEST {
                if let Ok(digest) = value.decode_as::<OctetString>() {
                    signed_attrs.message_digest = Some(digest.as_bytes().to_vec());
                }
            }
        }
    }

    SignerInfo {
        sid,
        digest_algorithm: oid_name(&signer.digest_alg.oid),
        signature_algorithm: oid_name(&signer.signature_algorithm.oid),
        signature: signer.signature.as_bytes().to_vec(),
        signed_attrs,
    }
}

/// Flatten an X.501 name into the typed attribute set.
pub(crate) fn distinguished_name(name: &Name) -> DistinguishedName {
    let mut dn = DistinguishedName::default();
    for rdn in name.0.iter() {
        for atv in rdn.0.iter() {
            let Some(value) = directory_string(&atv.value) else {
                continue;
            };
            if atv.oid == OID_AT_COMMON_NAME {
                dn.common_name.get_or_insert(value);
            } else if atv.oid == OID_AT_COUNTRY {
                dn.country.get_or_insert(value);
            } else if atv.oid == OID_AT_LOCALITY {
                dn.locality.get_or_insert(value);
            } else if atv.oid == OID_AT_ORGANIZATION {
                dn.organization.get_or_insert(value);
            } else if atv.oid == OID_AT_ORG_UNIT {
                dn.organizational_unit.get_or_insert(value);
            }
        }
    }
    dn
}

/// Decode a DirectoryString-ish attribute value to text.
fn directory_string(value: &Any) -> Option<String> {
    if let Ok(s) = value.decode_as::<PrintableStringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<Utf8StringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<Ia5StringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<TeletexStringRef<'_>>() {
        return Some(s.to_string());
    }
    None
}

/// Decode a signing-time attribute value (UTCTime or GeneralizedTime).
fn decode_time_attribute(value: &Any) -> Option<DateTime<FixedOffset>> {
    let duration = if let Ok(t) = value.decode_as::<UtcTime>() {
        t.to_unix_duration()
    } else if let Ok(t) = value.decode_as::<GeneralizedTime>() {
        t.to_unix_duration()
    } else {
        return None;
    };
    DateTime::<Utc>::from_timestamp(duration.as_secs() as i64, duration.subsec_nanos())
        .map(|dt| dt.fixed_offset())
}

fn der_time_to_utc(time: &Time) -> Option<DateTime<Utc>> {
    let duration = time.to_unix_duration();
    DateTime::<Utc>::from_timestamp(duration.as_secs() as i64, duration.subsec_nanos())
}

/// Canonical name for an algorithm or content-type OID.
///
/// Unknown OIDs fall back to their dotted form so nothing is lost.
pub fn oid_name(oid: &ObjectIdentifier) -> String {
    match oid.to_string().as_str() {
        // Digest algorithms
        "1.3.14.3.2.26" => "sha1".to_string(),
        "2.16.840.1.101.3.4.2.1" => "sha256".to_string(),
        "2.16.840.1.101.3.4.2.2" => "sha384".to_string(),
        "2.16.840.1.101.3.4.2.3" => "sha512".to_string(),
        "1.2.840.113549.2.5" => "md5".to_string(),

        // Signature algorithms
        "1.2.840.113549.1.1.1" => "rsassa_pkcs1v15".to_string(),
        "1.2.840.113549.1.1.5" => "sha1_rsa".to_string(),
        "1.2.840.113549.1.1.10" => "rsassa_pss".to_string(),
        "1.2.840.113549.1.1.11" => "sha256_rsa".to_string(),
        "1.2.840.113549.1.1.12" => "sha384_rsa".to_string(),
        "1.2.840.113549.1.1.13" => "sha512_rsa".to_string(),
        "1.2.840.10045.2.1" => "ec".to_string(),
        "1.2.840.10045.4.1" => "sha1_ecdsa".to_string(),
        "1.2.840.10045.4.3.2" => "sha256_ecdsa".to_string(),
        "1.2.840.10045.4.3.3" => "sha384_ecdsa".to_string(),
        "1.2.840.10045.4.3.4" => "sha512_ecdsa".to_string(),
        "1.3.101.112" => "ed25519".to_string(),

        // Content types
        "1.2.840.113549.1.7.1" => "data".to_string(),
        "1.2.840.113549.1.7.2" => "signed_data".to_string(),
        "1.2.840.113549.1.9.16.1.4" => "tst_info".to_string(),

        _ => oid.to_string(),
    }
}
