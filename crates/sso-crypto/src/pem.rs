//! PEM armour handling for certificates and private keys.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

const CERTIFICATE_TAG: &str = "CERTIFICATE";
const PKCS8_TAG: &str = "PRIVATE KEY";
const PKCS1_TAG: &str = "RSA PRIVATE KEY";

/// Private key DER together with its container format.
#[derive(Clone, PartialEq, Eq)]
pub enum PrivateKeyDer {
    /// PKCS#1 `RSAPrivateKey`.
    Pkcs1(Vec<u8>),
    /// PKCS#8 `PrivateKeyInfo`.
    Pkcs8(Vec<u8>),
}

impl PrivateKeyDer {
    /// Returns the raw DER bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Pkcs1(der) | Self::Pkcs8(der) => der,
        }
    }
}

impl std::fmt::Debug for PrivateKeyDer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Pkcs1(_) => "Pkcs1",
            Self::Pkcs8(_) => "Pkcs8",
        };
        write!(f, "PrivateKeyDer::{kind}(<redacted>)")
    }
}

fn parse_block(input: &str) -> CryptoResult<::pem::Pem> {
    ::pem::parse(input.trim()).map_err(|e| CryptoError::Pem(e.to_string()))
}

/// Decodes a PEM certificate into DER bytes.
///
/// # Errors
///
/// Returns [`CryptoError::Pem`] when the armour is malformed or is not a
/// `CERTIFICATE` block.
pub fn certificate_der(input: &str) -> CryptoResult<Vec<u8>> {
    let block = parse_block(input)?;
    if block.tag() != CERTIFICATE_TAG {
        return Err(CryptoError::Pem(format!(
            "expected {CERTIFICATE_TAG}, found {}",
            block.tag()
        )));
    }
    Ok(block.contents().to_vec())
}

/// Returns the certificate body as single-line base64, as embedded in
/// `ds:X509Certificate`.
///
/// # Errors
///
/// Returns [`CryptoError::Pem`] when the input is not a certificate.
pub fn certificate_base64(input: &str) -> CryptoResult<String> {
    certificate_der(input).map(|der| STANDARD.encode(der))
}

/// Decodes a PEM private key. Accepts PKCS#8 and PKCS#1 RSA armour.
///
/// # Errors
///
/// Returns [`CryptoError::Pem`] when the armour is malformed or carries an
/// unsupported label.
pub fn private_key_der(input: &str) -> CryptoResult<PrivateKeyDer> {
    let block = parse_block(input)?;
    match block.tag() {
        PKCS8_TAG => Ok(PrivateKeyDer::Pkcs8(block.contents().to_vec())),
        PKCS1_TAG => Ok(PrivateKeyDer::Pkcs1(block.contents().to_vec())),
        other => Err(CryptoError::Pem(format!("unsupported key label: {other}"))),
    }
}
