//! Hash functions backing XML signature references.

use aws_lc_rs::digest as lc;

use crate::algorithm::DigestAlgorithm;

/// Computes a digest of the input data.
#[must_use]
pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    let alg = match algorithm {
        DigestAlgorithm::Sha1 => &lc::SHA1_FOR_LEGACY_USE_ONLY,
        DigestAlgorithm::Sha256 => &lc::SHA256,
        DigestAlgorithm::Sha384 => &lc::SHA384,
        DigestAlgorithm::Sha512 => &lc::SHA512,
    };

    lc::digest(alg, data).as_ref().to_vec()
}

/// Computes a SHA-1 hash of the input data.
///
/// Only for relying parties that cannot verify SHA-2 digests.
#[must_use]
pub fn sha1(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha1, data)
}

/// Computes a SHA-256 hash of the input data.
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha256, data)
}

/// Computes a SHA-384 hash of the input data.
#[must_use]
pub fn sha384(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha384, data)
}

/// Computes a SHA-512 hash of the input data.
#[must_use]
pub fn sha512(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha512, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex(&sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha1_known_vector() {
        assert_eq!(
            hex(&sha1(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn output_lengths_match_algorithm() {
        for alg in [
            DigestAlgorithm::Sha1,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            assert_eq!(digest(alg, b"test").len(), alg.output_len());
        }
    }

    #[test]
    fn different_inputs_produce_different_hashes() {
        assert_ne!(sha384(b"hello"), sha384(b"world"));
        assert_eq!(sha512(b"hello"), sha512(b"hello"));
    }
}
