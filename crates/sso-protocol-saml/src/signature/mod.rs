//! Enveloped XML signatures.
//!
//! The signer wraps a finished response tree with a `ds:Signature` element.
//! Reference digests and the RSA signature method share one configurable
//! hash; SHA-256 is the default and SHA-1 is an explicit legacy opt-in.

mod signer;
mod validator;

pub use signer::*;
pub use validator::*;

use sso_crypto::DigestAlgorithm;
use sso_model::KeyMaterial;

use crate::error::SamlResult;
use crate::types::XmlElement;

/// Signs a document tree with the provider's key material.
///
/// Implementations either return the signed tree or an error; a failed
/// signature never yields a partially signed document.
pub trait DocumentSigner: Send + Sync {
    /// Inserts an enveloped signature into `document`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::Signature`] when the key material is
    /// unusable or signing fails.
    fn sign(&self, document: XmlElement, key: &KeyMaterial) -> SamlResult<XmlElement>;
}

/// Configuration for signature creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureConfig {
    /// Hash for the reference digest and the RSA signature method.
    pub digest: DigestAlgorithm,
    /// Whether to embed the X.509 certificate in `KeyInfo`.
    pub include_certificate: bool,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            digest: DigestAlgorithm::default(),
            include_certificate: true,
        }
    }
}

impl SignatureConfig {
    /// Creates a configuration with the given digest.
    #[must_use]
    pub const fn with_digest(digest: DigestAlgorithm) -> Self {
        Self {
            digest,
            include_certificate: true,
        }
    }

    /// Returns the `SignatureMethod` URI.
    #[must_use]
    pub const fn signature_method(&self) -> &'static str {
        self.digest.rsa_signature_uri()
    }
}
