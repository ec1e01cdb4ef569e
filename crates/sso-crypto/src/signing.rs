//! RSA PKCS#1 v1.5 signatures for XML-DSig.
//!
//! SHA-2 variants go through aws-lc-rs. aws-lc-rs refuses to produce SHA-1
//! signatures, so the legacy path signs with the `rsa` crate instead;
//! verification of every variant stays on aws-lc-rs.

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, KeyPair, RsaKeyPair, UnparsedPublicKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};

use crate::algorithm::DigestAlgorithm;
use crate::error::{CryptoError, CryptoResult};
use crate::pem::PrivateKeyDer;

fn load_key_pair(key: &PrivateKeyDer) -> CryptoResult<RsaKeyPair> {
    match key {
        PrivateKeyDer::Pkcs1(der) => RsaKeyPair::from_der(der),
        PrivateKeyDer::Pkcs8(der) => RsaKeyPair::from_pkcs8(der),
    }
    .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA key: {e}")))
}

fn sign_sha1(key: &PrivateKeyDer, data: &[u8]) -> CryptoResult<Vec<u8>> {
    let private_key = match key {
        PrivateKeyDer::Pkcs1(der) => rsa::RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA key: {e}")))?,
        PrivateKeyDer::Pkcs8(der) => rsa::RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA key: {e}")))?,
    };

    let signing_key = rsa::pkcs1v15::SigningKey::<sha1::Sha1>::new(private_key);
    let sig = signing_key
        .try_sign(data)
        .map_err(|e| CryptoError::Signing(format!("RSA-SHA1 signing failed: {e}")))?;
    Ok(sig.to_vec())
}

/// Signs `data` with RSA PKCS#1 v1.5 using the given hash.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKey`] if the key cannot be parsed and
/// [`CryptoError::Signing`] if the signature operation fails.
pub fn rsa_sign(key: &PrivateKeyDer, data: &[u8], algorithm: DigestAlgorithm) -> CryptoResult<Vec<u8>> {
    let padding = match algorithm {
        DigestAlgorithm::Sha1 => return sign_sha1(key, data),
        DigestAlgorithm::Sha256 => &signature::RSA_PKCS1_SHA256,
        DigestAlgorithm::Sha384 => &signature::RSA_PKCS1_SHA384,
        DigestAlgorithm::Sha512 => &signature::RSA_PKCS1_SHA512,
    };

    let key_pair = load_key_pair(key)?;
    let rng = SystemRandom::new();
    let mut sig = vec![0u8; key_pair.public_modulus_len()];

    key_pair
        .sign(padding, &rng, data, &mut sig)
        .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;

    Ok(sig)
}

/// Verifies an RSA PKCS#1 v1.5 signature.
///
/// `public_key_der` is the DER-encoded RSA public key as returned by
/// [`rsa_public_key_der`]. A signature that does not verify yields
/// `Ok(false)`.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for key format checks.
pub fn rsa_verify(
    public_key_der: &[u8],
    data: &[u8],
    sig: &[u8],
    algorithm: DigestAlgorithm,
) -> CryptoResult<bool> {
    let verification_alg: &dyn signature::VerificationAlgorithm = match algorithm {
        DigestAlgorithm::Sha1 => &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
        DigestAlgorithm::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        DigestAlgorithm::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        DigestAlgorithm::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
    };

    let public_key = UnparsedPublicKey::new(verification_alg, public_key_der);
    Ok(public_key.verify(data, sig).is_ok())
}

/// Extracts the DER-encoded public key from an RSA private key.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKey`] if the key cannot be parsed.
pub fn rsa_public_key_der(key: &PrivateKeyDer) -> CryptoResult<Vec<u8>> {
    let key_pair = load_key_pair(key)?;
    Ok(key_pair.public_key().as_ref().to_vec())
}
