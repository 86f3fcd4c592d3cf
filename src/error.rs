//! Error types for signature metadata extraction.
//!
//! Field-local malformation (a corrupt signature container) is recovered by
//! the pipeline: the field is skipped and extraction continues. Identity
//! resolution failure is not: a signer that cannot be attributed to any
//! embedded certificate aborts extraction for the whole document.

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during signature metadata extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document could not be parsed as a PDF.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// A signature field's raw bytes are not a well-formed DER container.
    ///
    /// Surfaced by the decoder; the pipeline recovers from it by skipping
    /// the offending field.
    #[error("Malformed signature container: {0}")]
    MalformedContainer(String),

    /// No certificate in the container matches a signer's issuer and serial.
    ///
    /// Fatal for the whole document: a signature with no attributable
    /// certificate must never be returned.
    #[error("No certificate found for signer: issuer='{issuer}', serial={serial}")]
    CertificateNotFound {
        /// Issuer distinguished name of the unmatched signer identifier.
        issuer: String,
        /// Certificate serial number of the unmatched signer identifier (hex).
        serial: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::InvalidPdf(err.to_string())
    }
}
