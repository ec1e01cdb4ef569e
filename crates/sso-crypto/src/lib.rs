//! # sso-crypto
//!
//! Cryptographic primitives for the SSO identity provider, built on aws-lc-rs.
//!
//! - Digests for XML signature references
//! - RSA PKCS#1 v1.5 signing and verification
//! - PEM to DER conversion for certificates and private keys
//! - Unpredictable document identifiers
//!
//! SHA-1 is only reachable through [`DigestAlgorithm::Sha1`], which exists for
//! relying parties that cannot verify anything newer.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod error;
pub mod hash;
pub mod pem;
pub mod random;
pub mod signing;

pub use algorithm::DigestAlgorithm;
pub use error::{CryptoError, CryptoResult};
pub use hash::{digest, sha1, sha256, sha384, sha512};
pub use pem::{certificate_base64, certificate_der, private_key_der, PrivateKeyDer};
pub use random::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use signing::{rsa_public_key_der, rsa_sign, rsa_verify};
