//! SAML 1.1 response builder.
//!
//! Older relying parties expect the 1.1 layout: split version attributes, a
//! password authentication statement, artifact subject confirmation and a
//! flat attribute list describing the principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sso_crypto::IdGenerator;
use sso_model::Principal;

use crate::error::SamlResult;
use crate::types::{saml11, XmlElement, SAML11_NS, SAMLP11_NS};

use super::{checked, validity_window};

/// Principal fields published as 1.1 attributes.
///
/// Each version is a fixed list; new principal fields never reach the wire
/// until a new version names them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyAttributeProfile {
    /// Profile fields, without roles or permissions.
    #[default]
    V1,
}

impl LegacyAttributeProfile {
    /// Attribute names in emission order.
    #[must_use]
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::V1 => &[
                "owner",
                "name",
                "id",
                "createdTime",
                "type",
                "displayName",
                "firstName",
                "lastName",
                "email",
                "phone",
                "avatar",
                "region",
                "location",
                "affiliation",
                "title",
                "homepage",
                "tag",
                "language",
            ],
        }
    }

    /// Returns the non-empty fields of `principal` covered by this profile.
    #[must_use]
    pub fn attributes(self, principal: &Principal) -> Vec<(&'static str, &str)> {
        self.field_names()
            .iter()
            .filter_map(|&name| {
                let value = match (self, name) {
                    (Self::V1, "owner") => &principal.owner,
                    (Self::V1, "name") => &principal.name,
                    (Self::V1, "id") => &principal.id,
                    (Self::V1, "createdTime") => &principal.created_time,
                    (Self::V1, "type") => &principal.kind,
                    (Self::V1, "displayName") => &principal.display_name,
                    (Self::V1, "firstName") => &principal.first_name,
                    (Self::V1, "lastName") => &principal.last_name,
                    (Self::V1, "email") => &principal.email,
                    (Self::V1, "phone") => &principal.phone,
                    (Self::V1, "avatar") => &principal.avatar,
                    (Self::V1, "region") => &principal.region,
                    (Self::V1, "location") => &principal.location,
                    (Self::V1, "affiliation") => &principal.affiliation,
                    (Self::V1, "title") => &principal.title,
                    (Self::V1, "homepage") => &principal.homepage,
                    (Self::V1, "tag") => &principal.tag,
                    (Self::V1, "language") => &principal.language,
                    _ => return None,
                };
                (!value.is_empty()).then_some((name, value.as_str()))
            })
            .collect()
    }
}

/// Builder for SAML 1.1 responses.
#[derive(Debug, Clone)]
pub struct LegacyResponseBuilder<'a> {
    request_id: &'a str,
    principal: &'a Principal,
    issuer: String,
    issue_instant: DateTime<Utc>,
    profile: LegacyAttributeProfile,
}

impl<'a> LegacyResponseBuilder<'a> {
    /// Creates a builder for a response to the request `request_id`.
    #[must_use]
    pub fn new(request_id: &'a str, principal: &'a Principal) -> Self {
        Self {
            request_id,
            principal,
            issuer: String::new(),
            issue_instant: Utc::now(),
            profile: LegacyAttributeProfile::default(),
        }
    }

    /// Sets the provider identity written to the assertion `Issuer`.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the issue instant.
    #[must_use]
    pub const fn issue_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.issue_instant = instant;
        self
    }

    /// Selects the attribute profile.
    #[must_use]
    pub const fn profile(mut self, profile: LegacyAttributeProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Builds the unsigned response tree.
    ///
    /// Draws two identifiers from `ids`: response ID, then assertion ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::Serialization`] if a principal field
    /// cannot be written as XML.
    pub fn build(self, ids: &dyn IdGenerator) -> SamlResult<XmlElement> {
        let (now, expires) = validity_window(self.issue_instant)?;
        let response_id = ids.next_id();
        let assertion_id = ids.next_id();

        let authentication = XmlElement::new("saml:AuthenticationStatement")
            .attr("AuthenticationMethod", saml11::AM_PASSWORD)
            .attr("AuthenticationInstant", &now)
            .child(self.subject()?);

        let mut attributes = XmlElement::new("saml:AttributeStatement").child(self.subject()?);
        for (name, value) in self.profile.attributes(self.principal) {
            attributes = attributes.child(
                XmlElement::new("saml:Attribute")
                    .attr("AttributeName", name)
                    .attr("AttributeNamespace", saml11::ATTRIBUTE_NAMESPACE)
                    .child(XmlElement::new("saml:AttributeValue").text(checked(value)?)),
            );
        }

        let assertion = XmlElement::new("saml:Assertion")
            .attr("xmlns:saml", SAML11_NS)
            .attr("MajorVersion", "1")
            .attr("MinorVersion", "1")
            .attr("AssertionID", assertion_id)
            .attr("Issuer", checked(&self.issuer)?)
            .attr("IssueInstant", &now)
            .child(
                XmlElement::new("saml:Conditions")
                    .attr("NotBefore", &now)
                    .attr("NotOnOrAfter", expires),
            )
            .child(authentication)
            .child(attributes);

        Ok(XmlElement::new("samlp:Response")
            .attr("xmlns:samlp", SAMLP11_NS)
            .attr("MajorVersion", "1")
            .attr("MinorVersion", "1")
            .attr("ResponseID", response_id)
            .attr("InResponseTo", checked(self.request_id)?)
            .attr("IssueInstant", &now)
            .child(
                XmlElement::new("samlp:Status").child(
                    XmlElement::new("samlp:StatusCode").attr("Value", saml11::STATUS_SUCCESS),
                ),
            )
            .child(assertion))
    }

    fn subject(&self) -> SamlResult<XmlElement> {
        Ok(XmlElement::new("saml:Subject")
            .child(XmlElement::new("saml:NameIdentifier").text(checked(&self.principal.name)?))
            .child(
                XmlElement::new("saml:SubjectConfirmation").child(
                    XmlElement::new("saml:ConfirmationMethod").text(saml11::CM_ARTIFACT),
                ),
            ))
    }
}
