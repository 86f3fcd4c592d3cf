//! Signer-to-certificate correlation.
//!
//! Each signer info names its certificate by (issuer, serial number). The
//! issuer+serial pair is assumed unique within one container; when it is not,
//! the first certificate in container order wins deterministically.

use crate::error::{Error, Result};
use crate::types::{Certificate, SignedDataContainer, SignerInfo};

/// Find the certificate matching a signer's identifier within the same
/// container's certificate set.
///
/// Zero matches is a fatal error for that signer: the signature cannot be
/// attributed to any identity, and downstream trust decisions must not
/// proceed silently.
pub fn find_certificate<'a>(
    container: &'a SignedDataContainer,
    signer: &SignerInfo,
) -> Result<&'a Certificate> {
    container
        .certificates
        .iter()
        .find(|cert| {
            cert.issuer_raw == signer.sid.issuer
                && cert.serial_number == signer.sid.serial_number
        })
        .ok_or_else(|| Error::CertificateNotFound {
            issuer: signer.sid.issuer.clone(),
            serial: signer.sid.serial_number.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DistinguishedName, SignedAttributes, SignerId};
    use chrono::{DateTime, Utc};

    fn cert(issuer: &str, serial: &str, subject_cn: &str) -> Certificate {
        Certificate {
            serial_number: serial.to_string(),
            issuer: DistinguishedName::default(),
            subject: DistinguishedName {
                common_name: Some(subject_cn.to_string()),
                ..Default::default()
            },
            not_before: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            not_after: DateTime::<Utc>::from_timestamp(1, 0).unwrap(),
            issuer_raw: issuer.to_string(),
        }
    }

    fn signer(issuer: &str, serial: &str) -> SignerInfo {
        SignerInfo {
            sid: SignerId {
                issuer: issuer.to_string(),
                serial_number: serial.to_string(),
            },
            digest_algorithm: "sha256".to_string(),
            signature_algorithm: "rsassa_pkcs1v15".to_string(),
            signature: Vec::new(),
            signed_attrs: SignedAttributes::default(),
        }
    }

    #[test]
    fn test_match_by_issuer_and_serial() {
        let container = SignedDataContainer {
            certificates: vec![
                cert("CN=Other CA", "01", "other"),
                cert("CN=Example CA", "02", "wanted"),
            ],
            signer_infos: Vec::new(),
        };
        let found = find_certificate(&container, &signer("CN=Example CA", "02")).unwrap();
        assert_eq!(found.subject.common_name.as_deref(), Some("wanted"));
    }

    #[test]
    fn test_serial_alone_is_not_enough() {
        let container = SignedDataContainer {
            certificates: vec![cert("CN=Other CA", "02", "other")],
            signer_infos: Vec::new(),
        };
        let err = find_certificate(&container, &signer("CN=Example CA", "02")).unwrap_err();
        assert!(matches!(err, Error::CertificateNotFound { .. }));
    }

    #[test]
    fn test_first_match_wins_in_container_order() {
        let container = SignedDataContainer {
            certificates: vec![
                cert("CN=Example CA", "02", "first"),
                cert("CN=Example CA", "02", "second"),
            ],
            signer_infos: Vec::new(),
        };
        let found = find_certificate(&container, &signer("CN=Example CA", "02")).unwrap();
        assert_eq!(found.subject.common_name.as_deref(), Some("first"));
    }

    #[test]
    fn test_no_match_reports_identifier() {
        let container = SignedDataContainer::default();
        let err = find_certificate(&container, &signer("CN=Example CA", "ff")).unwrap_err();
        match err {
            Error::CertificateNotFound { issuer, serial } => {
                assert_eq!(issuer, "CN=Example CA");
                assert_eq!(serial, "ff");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
