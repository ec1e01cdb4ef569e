//! SAML error types.
//!
//! One variant per failure class of the response pipeline. Every variant
//! carries a descriptive message and terminates the pipeline at the stage
//! that raised it.

use thiserror::Error;

use crate::types::status_codes;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML identity provider errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// The inbound request is not valid base64 or not a valid DEFLATE stream.
    #[error("cannot decode request: {0}")]
    Decode(String),

    /// The request XML is ill-formed or lacks required fields.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The request issuer is not an allow-listed redirect URI.
    #[error("issuer is not allowed: {issuer}")]
    UnauthorizedIssuer {
        /// The rejected issuer URL.
        issuer: String,
    },

    /// Neither the application nor the request names a consumer URL.
    #[error("no destination: {0}")]
    MissingDestination(String),

    /// The signature could not be produced.
    #[error("signature failed: {0}")]
    Signature(String),

    /// The document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The serialized document could not be compressed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// The IdP certificate could not be decoded for metadata.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Provider configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SamlError {
    /// Returns the SAML status code for this error.
    ///
    /// Input problems map to `Requester`, everything else to `Responder`.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::Decode(_)
            | Self::MalformedRequest(_)
            | Self::UnauthorizedIssuer { .. }
            | Self::MissingDestination(_) => status_codes::REQUESTER,
            Self::Signature(_)
            | Self::Serialization(_)
            | Self::Compression(_)
            | Self::InvalidCertificate(_)
            | Self::Config(_) => status_codes::RESPONDER,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Decode(_) | Self::MalformedRequest(_) | Self::MissingDestination(_) => 400,
            Self::UnauthorizedIssuer { .. } => 403,
            _ => 500,
        }
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedRequest(err.to_string())
    }
}

impl From<sso_crypto::CryptoError> for SamlError {
    fn from(err: sso_crypto::CryptoError) -> Self {
        Self::Signature(err.to_string())
    }
}
