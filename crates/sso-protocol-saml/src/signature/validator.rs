//! XML signature verification.
//!
//! Verifies documents produced by [`super::XmlSigner`]. This is the relying
//! party's view of a response and backs diagnostics and tests; the provider
//! itself never verifies inbound signatures.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sso_crypto::DigestAlgorithm;
use tracing::debug;

use crate::error::{SamlError, SamlResult};
use crate::types::{canonicalize, canonicalize_in, XmlElement};

use super::signer::reference_id;

/// Verifies the enveloped signature on a serialized document.
///
/// `public_key_der` is the signer's RSA public key in PKCS#1 DER form, as
/// returned by [`sso_crypto::rsa_public_key_der`]. Returns `Ok(false)` when
/// the digest or the signature value does not match.
///
/// # Errors
///
/// Returns [`SamlError::Signature`] when the document carries no signature
/// or the signature structure is unusable, and
/// [`SamlError::Serialization`] when the document is not well-formed.
pub fn verify_enveloped(xml: &str, public_key_der: &[u8]) -> SamlResult<bool> {
    let mut document = XmlElement::parse(xml)?;
    let signature = document
        .remove_child("Signature")
        .ok_or_else(|| SamlError::Signature("document is not signed".to_string()))?;

    let signed_info = required(&signature, "SignedInfo")?;
    let method = required(signed_info, "SignatureMethod")?
        .attribute("Algorithm")
        .unwrap_or_default();
    let algorithm = DigestAlgorithm::from_rsa_signature_uri(method)
        .ok_or_else(|| SamlError::Signature(format!("unsupported signature method: {method}")))?;

    let reference = required(signed_info, "Reference")?;
    let expected_uri = format!("#{}", reference_id(&document)?);
    if reference.attribute("URI") != Some(expected_uri.as_str()) {
        return Err(SamlError::Signature(format!(
            "reference does not point at the root element {expected_uri}"
        )));
    }
    if required(reference, "DigestMethod")?.attribute("Algorithm") != Some(algorithm.digest_uri()) {
        return Err(SamlError::Signature("digest method does not match signature method".to_string()));
    }

    let expected_digest = decode_base64(&required(reference, "DigestValue")?.text_content())?;
    let actual_digest = sso_crypto::digest(algorithm, canonicalize(&document)?.as_bytes());
    if actual_digest != expected_digest {
        debug!("reference digest mismatch");
        return Ok(false);
    }

    let signature_value = decode_base64(&required(&signature, "SignatureValue")?.text_content())?;
    let signed = canonicalize_in(signed_info, document.attributes().chain(signature.attributes()))?;
    let valid = sso_crypto::rsa_verify(public_key_der, signed.as_bytes(), &signature_value, algorithm)?;

    debug!(valid, algorithm = %algorithm, "signature checked");
    Ok(valid)
}

fn required<'a>(parent: &'a XmlElement, local_name: &str) -> SamlResult<&'a XmlElement> {
    parent
        .find(local_name)
        .ok_or_else(|| SamlError::Signature(format!("{} has no {local_name}", parent.name())))
}

fn decode_base64(value: &str) -> SamlResult<Vec<u8>> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| SamlError::Signature(format!("invalid base64 in signature: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{DocumentSigner, SignatureConfig, XmlSigner};
    use sso_model::KeyMaterial;

    const KEY: &str = include_str!("../../tests/fixtures/idp-key.pem");
    const CERT: &str = include_str!("../../tests/fixtures/idp-cert.pem");

    fn public_key() -> Vec<u8> {
        let key = sso_crypto::private_key_der(KEY).unwrap();
        sso_crypto::rsa_public_key_der(&key).unwrap()
    }

    fn signed_xml(config: SignatureConfig) -> String {
        let doc = XmlElement::new("samlp:Response")
            .attr("ID", "_r1")
            .attr("Destination", "https://sp.example/acs")
            .child(XmlElement::new("saml:Issuer").text("https://idp.example"))
            .child(XmlElement::new("saml:Assertion").text("alice & bob"));
        XmlSigner::new(config)
            .sign(doc, &KeyMaterial::new(CERT, KEY))
            .unwrap()
            .to_xml()
            .unwrap()
    }

    #[test]
    fn verifies_every_digest() {
        for digest in DigestAlgorithm::ALL {
            let xml = signed_xml(SignatureConfig::with_digest(digest));
            assert!(verify_enveloped(&xml, &public_key()).unwrap(), "{digest}");
        }
    }

    #[test]
    fn tampered_content_fails() {
        let xml = signed_xml(SignatureConfig::default()).replace("alice", "mallory");
        assert!(!verify_enveloped(&xml, &public_key()).unwrap());
    }

    #[test]
    fn tampered_attribute_fails() {
        let xml = signed_xml(SignatureConfig::default()).replace("sp.example/acs", "evil.example/acs");
        assert!(!verify_enveloped(&xml, &public_key()).unwrap());
    }

    #[test]
    fn attribute_order_and_spare_declarations_do_not_matter() {
        let xml = signed_xml(SignatureConfig::default()).replacen(
            r#"<samlp:Response ID="_r1" Destination="https://sp.example/acs">"#,
            r#"<samlp:Response xmlns:unused="urn:unused" Destination="https://sp.example/acs" ID="_r1">"#,
            1,
        );
        assert!(xml.contains("xmlns:unused"));
        assert!(verify_enveloped(&xml, &public_key()).unwrap());
    }

    #[test]
    fn unsigned_document_is_an_error() {
        let xml = r#"<samlp:Response ID="_r1"><saml:Issuer>x</saml:Issuer></samlp:Response>"#;
        assert!(matches!(
            verify_enveloped(xml, &public_key()),
            Err(SamlError::Signature(_))
        ));
    }
}
