//! # pdf_sigmeta
//!
//! Extract and normalize digital-signature metadata embedded in PDF
//! documents: locate signature fields, decode the embedded CMS/PKCS#7
//! container, correlate each signer to the certificate that issued it, and
//! project the result into a flat, serializable record (algorithms, validity
//! window, issuer/subject identity, signing time, signature handler and
//! subtype).
//!
//! ## Pipeline
//!
//! PDF document → [`scanner::SignatureScanner`] (per-field raw bytes +
//! field metadata) → [`cms::decode_signed_data`] (signer infos,
//! certificates) → [`matcher::find_certificate`] (signer ↔ certificate) →
//! [`timestamp::parse_pdf_date`] → [`details::project`] → ordered sequence
//! of flat [`SignatureDetails`] records.
//!
//! ## What this crate does not do
//!
//! Cryptographic signature verification, certificate-chain validation and
//! trust decisions are out of scope: this crate decodes structure and
//! identity so an embedding system can make those decisions.
//!
//! ## Error policy
//!
//! A corrupt signature container skips its own field and extraction
//! continues; a signer with no matching embedded certificate fails the whole
//! document call, because a signature that cannot be attributed to an
//! identity must never be returned. Zero signature fields is a distinguished
//! empty result, not an error.
//!
//! ## Example
//!
//! ```ignore
//! let bytes = std::fs::read("signed.pdf")?;
//! for details in pdf_sigmeta::extract(&bytes)? {
//!     println!("{}", serde_json::to_string_pretty(&details)?);
//! }
//! ```
//!
//! Extraction is synchronous and shares no state across calls; distinct
//! documents may be processed concurrently without coordination.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Domain models
pub mod types;

// Pipeline stages
pub mod cms;
pub mod matcher;
pub mod scanner;
pub mod timestamp;

// Orchestration and projection
pub mod details;
pub mod pipeline;

// Re-exports
pub use details::{project, IssuerDetails, SignatureDetails, SubjectDetails};
pub use error::{Error, Result};
pub use pipeline::{extract, Signatures};
pub use scanner::SignatureScanner;
pub use types::{
    Certificate, DistinguishedName, ResolvedSignature, SignatureField, SignatureKind,
    SignedAttributes, SignedDataContainer, SignerId, SignerInfo,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
