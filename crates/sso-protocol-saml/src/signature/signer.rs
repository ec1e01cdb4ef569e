//! XML signature creation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sso_model::KeyMaterial;
use tracing::{debug, error};

use crate::error::{SamlError, SamlResult};
use crate::types::{canonicalize, canonicalize_in, transforms, XmlElement, XMLDSIG_NS};

use super::{DocumentSigner, SignatureConfig};

/// Signs response trees with an enveloped RSA signature.
#[derive(Debug, Clone, Default)]
pub struct XmlSigner {
    config: SignatureConfig,
}

impl XmlSigner {
    /// Creates a signer with the given configuration.
    #[must_use]
    pub const fn new(config: SignatureConfig) -> Self {
        Self { config }
    }

    /// Returns the signer's configuration.
    #[must_use]
    pub const fn config(&self) -> &SignatureConfig {
        &self.config
    }

    fn try_sign(&self, mut document: XmlElement, key: &KeyMaterial) -> SamlResult<XmlElement> {
        let reference_id = reference_id(&document)?;
        let private_key = sso_crypto::private_key_der(&key.private_key_pem)?;

        // The digest covers the root before the signature exists; the
        // enveloped transform strips it again on the verifying side.
        let unsigned = canonicalize(&document)?;
        let digest = sso_crypto::digest(self.config.digest, unsigned.as_bytes());

        let signed_info = build_signed_info(&reference_id, &STANDARD.encode(digest), &self.config);
        let signed_bytes = canonicalize_in(&signed_info, [("xmlns:ds", XMLDSIG_NS)])?;
        let signature_value = sso_crypto::rsa_sign(&private_key, signed_bytes.as_bytes(), self.config.digest)?;

        let mut signature = XmlElement::new("ds:Signature")
            .attr("xmlns:ds", XMLDSIG_NS)
            .child(signed_info)
            .child(XmlElement::new("ds:SignatureValue").text(STANDARD.encode(signature_value)));

        if self.config.include_certificate {
            let certificate = sso_crypto::certificate_base64(&key.certificate_pem)?;
            signature = signature.child(
                XmlElement::new("ds:KeyInfo").child(
                    XmlElement::new("ds:X509Data")
                        .child(XmlElement::new("ds:X509Certificate").text(certificate)),
                ),
            );
        }

        let index = document.position_of("Issuer").map_or(0, |i| i + 1);
        document.insert_child(index, signature);

        debug!(
            reference = %reference_id,
            digest = %self.config.digest,
            "document signed"
        );

        Ok(document)
    }
}

impl DocumentSigner for XmlSigner {
    fn sign(&self, document: XmlElement, key: &KeyMaterial) -> SamlResult<XmlElement> {
        self.try_sign(document, key).map_err(|e| {
            error!(error = %e, "failed to sign document");
            match e {
                SamlError::Serialization(_) | SamlError::Signature(_) => e,
                other => SamlError::Signature(other.to_string()),
            }
        })
    }
}

/// Returns the identifier the signature reference points at: `ID` for
/// SAML 2.0 documents, `ResponseID` for SAML 1.1.
pub(crate) fn reference_id(document: &XmlElement) -> SamlResult<String> {
    document
        .attribute("ID")
        .or_else(|| document.attribute("ResponseID"))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            SamlError::Signature(format!(
                "root element {} carries no ID to reference",
                document.name()
            ))
        })
}

fn build_signed_info(reference_id: &str, digest_b64: &str, config: &SignatureConfig) -> XmlElement {
    XmlElement::new("ds:SignedInfo")
        .child(
            XmlElement::new("ds:CanonicalizationMethod")
                .attr("Algorithm", transforms::EXCLUSIVE_C14N),
        )
        .child(XmlElement::new("ds:SignatureMethod").attr("Algorithm", config.signature_method()))
        .child(
            XmlElement::new("ds:Reference")
                .attr("URI", format!("#{reference_id}"))
                .child(
                    XmlElement::new("ds:Transforms")
                        .child(
                            XmlElement::new("ds:Transform")
                                .attr("Algorithm", transforms::ENVELOPED_SIGNATURE),
                        )
                        .child(
                            XmlElement::new("ds:Transform")
                                .attr("Algorithm", transforms::EXCLUSIVE_C14N),
                        ),
                )
                .child(
                    XmlElement::new("ds:DigestMethod").attr("Algorithm", config.digest.digest_uri()),
                )
                .child(XmlElement::new("ds:DigestValue").text(digest_b64)),
        )
}
