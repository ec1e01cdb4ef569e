//! SAML 2.0 response builder.

use chrono::{DateTime, Utc};
use sso_crypto::IdGenerator;
use sso_model::{Principal, RoleResolver};

use crate::error::{SamlError, SamlResult};
use crate::types::{
    status_codes, AuthnContextClass, AuthnRequest, XmlElement, ATTRNAME_FORMAT_BASIC, CM_BEARER,
    SAMLP_NS, SAML_NS, XSI_NS, XS_NS,
};

use super::{checked, validity_window};

/// Builder for SAML 2.0 responses carrying one assertion.
///
/// The response answers `request`, is addressed to `destination` and names
/// `principal` as subject. Audiences default to the request issuer alone.
#[derive(Debug, Clone)]
pub struct ResponseBuilder<'a> {
    request: &'a AuthnRequest,
    principal: &'a Principal,
    issuer: String,
    destination: String,
    audiences: Vec<String>,
    issue_instant: DateTime<Utc>,
    roles_separator: String,
}

impl<'a> ResponseBuilder<'a> {
    /// Creates a builder for a response to `request` about `principal`.
    #[must_use]
    pub fn new(request: &'a AuthnRequest, principal: &'a Principal) -> Self {
        Self {
            request,
            principal,
            issuer: String::new(),
            destination: String::new(),
            audiences: vec![request.issuer.clone()],
            issue_instant: Utc::now(),
            roles_separator: ",".to_string(),
        }
    }

    /// Sets the provider entity ID written to both `Issuer` elements.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the resolved delivery URL.
    #[must_use]
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Replaces the audience list.
    #[must_use]
    pub fn audiences(mut self, audiences: Vec<String>) -> Self {
        self.audiences = audiences;
        self
    }

    /// Sets the issue instant every timestamp derives from.
    #[must_use]
    pub const fn issue_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.issue_instant = instant;
        self
    }

    /// Sets the delimiter between role names.
    #[must_use]
    pub fn roles_separator(mut self, separator: impl Into<String>) -> Self {
        self.roles_separator = separator.into();
        self
    }

    /// Builds the unsigned response tree.
    ///
    /// Draws three identifiers from `ids`, in order: response ID, assertion
    /// ID and session index.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MissingDestination`] if no destination was set
    /// and [`SamlError::Serialization`] if a value cannot be written as XML.
    pub fn build(self, ids: &dyn IdGenerator, roles: &dyn RoleResolver) -> SamlResult<XmlElement> {
        if self.destination.is_empty() {
            return Err(SamlError::MissingDestination(format!(
                "no destination for response to {}",
                self.request.id
            )));
        }

        let (now, expires) = validity_window(self.issue_instant)?;
        let response_id = ids.next_id();
        let assertion_id = ids.next_id();
        let session_index = ids.next_id();
        let request_id = checked(&self.request.id)?;
        let destination = checked(&self.destination)?;

        let subject = XmlElement::new("saml:Subject")
            .child(XmlElement::new("saml:NameID").text(checked(&self.principal.name)?))
            .child(
                XmlElement::new("saml:SubjectConfirmation")
                    .attr("Method", CM_BEARER)
                    .child(
                        XmlElement::new("saml:SubjectConfirmationData")
                            .attr("InResponseTo", request_id)
                            .attr("Recipient", destination)
                            .attr("NotOnOrAfter", &expires),
                    ),
            );

        let mut restriction = XmlElement::new("saml:AudienceRestriction");
        for audience in &self.audiences {
            restriction = restriction.child(XmlElement::new("saml:Audience").text(checked(audience)?));
        }
        let conditions = XmlElement::new("saml:Conditions")
            .attr("NotBefore", &now)
            .attr("NotOnOrAfter", &expires)
            .child(restriction);

        let authn_statement = XmlElement::new("saml:AuthnStatement")
            .attr("AuthnInstant", &now)
            .attr("SessionIndex", session_index)
            .attr("SessionNotOnOrAfter", &expires)
            .child(XmlElement::new("saml:AuthnContext").child(
                XmlElement::new("saml:AuthnContextClassRef")
                    .text(AuthnContextClass::PasswordProtectedTransport.uri()),
            ));

        let role_value = roles
            .effective_roles(self.principal)
            .join(&self.roles_separator);
        let attributes = XmlElement::new("saml:AttributeStatement")
            .child(attribute("Email", &self.principal.email)?)
            .child(attribute("Name", &self.principal.name)?)
            .child(attribute("DisplayName", &self.principal.display_name)?)
            .child(attribute("Roles", &role_value)?);

        let assertion = XmlElement::new("saml:Assertion")
            .attr("xmlns:xsi", XSI_NS)
            .attr("xmlns:xs", XS_NS)
            .attr("ID", assertion_id)
            .attr("Version", "2.0")
            .attr("IssueInstant", &now)
            .child(XmlElement::new("saml:Issuer").text(checked(&self.issuer)?))
            .child(subject)
            .child(conditions)
            .child(authn_statement)
            .child(attributes);

        Ok(XmlElement::new("samlp:Response")
            .attr("xmlns:samlp", SAMLP_NS)
            .attr("xmlns:saml", SAML_NS)
            .attr("ID", response_id)
            .attr("Version", "2.0")
            .attr("IssueInstant", &now)
            .attr("Destination", destination)
            .attr("InResponseTo", request_id)
            .child(XmlElement::new("saml:Issuer").text(&self.issuer))
            .child(
                XmlElement::new("samlp:Status")
                    .child(XmlElement::new("samlp:StatusCode").attr("Value", status_codes::SUCCESS)),
            )
            .child(assertion))
    }
}

fn attribute(name: &str, value: &str) -> SamlResult<XmlElement> {
    Ok(XmlElement::new("saml:Attribute")
        .attr("Name", name)
        .attr("NameFormat", ATTRNAME_FORMAT_BASIC)
        .child(
            XmlElement::new("saml:AttributeValue")
                .attr("xsi:type", "xs:string")
                .text(checked(value)?),
        ))
}
