//! IdP metadata.
//!
//! Describes the provider to relying parties: signing certificate, accepted
//! name ID formats, the single sign-on endpoint and the attribute
//! vocabulary. Built fresh per call; nothing here is signed.

use sso_model::RelyingApplication;
use tracing::debug;

use crate::error::{SamlError, SamlResult};
use crate::origin::Origins;
use crate::types::{
    NameIdFormat, SamlBinding, XmlElement, ATTRNAME_FORMAT_BASIC, METADATA_NS, SAMLP_NS, SAML_NS,
    XMLDSIG_NS,
};

/// Attributes advertised in metadata as `(Name, FriendlyName)`.
pub const ADVERTISED_ATTRIBUTES: [(&str, &str); 3] = [
    ("Email", "E-Mail"),
    ("DisplayName", "displayName"),
    ("Name", "Name"),
];

/// Single sign-on location for an application.
#[must_use]
pub fn sso_location(application: &RelyingApplication, origins: &Origins) -> String {
    format!(
        "{}/login/saml/authorize/{}/{}",
        origins.frontend, application.owner, application.name
    )
}

/// Builds the metadata document for `application`.
///
/// # Errors
///
/// Returns [`SamlError::InvalidCertificate`] when `certificate_pem` is not a
/// PEM certificate and [`SamlError::Serialization`] when a value cannot be
/// written as XML.
pub fn build_metadata(
    application: &RelyingApplication,
    certificate_pem: &str,
    origins: &Origins,
) -> SamlResult<String> {
    let certificate = sso_crypto::certificate_base64(certificate_pem)
        .map_err(|e| SamlError::InvalidCertificate(e.to_string()))?;
    let location = sso_location(application, origins);

    let key_descriptor = XmlElement::new("md:KeyDescriptor").attr("use", "signing").child(
        XmlElement::new("ds:KeyInfo").child(
            XmlElement::new("ds:X509Data")
                .child(XmlElement::new("ds:X509Certificate").text(certificate)),
        ),
    );

    let descriptor = XmlElement::new("md:IDPSSODescriptor")
        .attr("protocolSupportEnumeration", SAMLP_NS)
        .child(key_descriptor)
        .children(
            NameIdFormat::ADVERTISED
                .iter()
                .map(|format| XmlElement::new("md:NameIDFormat").text(format.uri())),
        )
        .child(
            XmlElement::new("md:SingleSignOnService")
                .attr("Binding", SamlBinding::HttpRedirect.uri())
                .attr("Location", &location),
        )
        .children(ADVERTISED_ATTRIBUTES.iter().map(|(name, friendly)| {
            XmlElement::new("saml:Attribute")
                .attr("xmlns:saml", SAML_NS)
                .attr("Name", *name)
                .attr("NameFormat", ATTRNAME_FORMAT_BASIC)
                .attr("FriendlyName", *friendly)
        }));

    let document = XmlElement::new("md:EntityDescriptor")
        .attr("xmlns:md", METADATA_NS)
        .attr("xmlns:ds", XMLDSIG_NS)
        .attr("entityID", &origins.backend)
        .child(descriptor)
        .to_document()?;

    debug!(
        owner = %application.owner,
        application = %application.name,
        location = %location,
        "metadata built"
    );

    Ok(document)
}
