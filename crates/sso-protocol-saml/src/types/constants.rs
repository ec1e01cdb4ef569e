//! SAML constants and URIs.
//!
//! Namespace URIs, binding URIs, name ID formats and the fixed URIs used by
//! the 2.0 and 1.1 response layouts.

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// SAML 2.0 metadata namespace URI.
pub const METADATA_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// SAML 1.0 assertion namespace URI (shared by 1.1).
pub const SAML11_NS: &str = "urn:oasis:names:tc:SAML:1.0:assertion";

/// SAML 1.0 protocol namespace URI (shared by 1.1).
pub const SAMLP11_NS: &str = "urn:oasis:names:tc:SAML:1.0:protocol";

/// XML Digital Signature namespace URI.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XSI namespace URI.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XS namespace URI.
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

// ============================================================================
// Binding URIs
// ============================================================================

/// SAML binding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamlBinding {
    /// HTTP POST binding.
    HttpPost,
    /// HTTP Redirect binding.
    HttpRedirect,
}

impl SamlBinding {
    /// Returns the URI for this binding.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
        }
    }

    /// Parses a binding from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" => Some(Self::HttpPost),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" => Some(Self::HttpRedirect),
            _ => None,
        }
    }
}

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats advertised by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameIdFormat {
    /// Email address format.
    Email,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format.
    Transient,
}

impl NameIdFormat {
    /// Formats listed in IdP metadata, in document order.
    pub const ADVERTISED: [Self; 3] = [Self::Email, Self::Persistent, Self::Transient];

    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }
}

// ============================================================================
// Authentication Context Classes
// ============================================================================

/// SAML authentication context class references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthnContextClass {
    /// Password protected transport (TLS + password).
    #[default]
    PasswordProtectedTransport,
}

impl AuthnContextClass {
    /// Returns the URI for this authentication context class.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::PasswordProtectedTransport => {
                "urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport"
            }
        }
    }
}

// ============================================================================
// Status Codes
// ============================================================================

/// Top-level SAML 2.0 status codes.
pub mod status_codes {
    /// Success status code.
    pub const SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";
    /// Requester error status code.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";
    /// Responder error status code.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
}

// ============================================================================
// Subject Confirmation and Attributes
// ============================================================================

/// Bearer subject confirmation method.
pub const CM_BEARER: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

/// Basic attribute name format.
pub const ATTRNAME_FORMAT_BASIC: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:basic";

/// Fixed values used by the SAML 1.1 layout.
pub mod saml11 {
    /// Status code value for success, as a QName.
    pub const STATUS_SUCCESS: &str = "samlp:Success";
    /// Password authentication method.
    pub const AM_PASSWORD: &str = "urn:oasis:names:tc:SAML:1.0:am:password";
    /// Artifact subject confirmation method.
    pub const CM_ARTIFACT: &str = "urn:oasis:names:tc:SAML:1.0:cm:artifact";
    /// Namespace attached to every emitted attribute.
    pub const ATTRIBUTE_NAMESPACE: &str = "http://www.ja-sig.org/products/cas/";
}

// ============================================================================
// Signature Transforms
// ============================================================================

/// XML signature transform and canonicalization URIs.
pub mod transforms {
    /// Enveloped signature transform.
    pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
    /// Exclusive XML canonicalization without comments.
    pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_uri_roundtrip() {
        for binding in [SamlBinding::HttpPost, SamlBinding::HttpRedirect] {
            assert_eq!(SamlBinding::from_uri(binding.uri()), Some(binding));
        }
        assert_eq!(SamlBinding::from_uri("urn:unknown"), None);
    }

    #[test]
    fn advertised_name_id_formats() {
        let uris: Vec<&str> = NameIdFormat::ADVERTISED.iter().map(NameIdFormat::uri).collect();
        assert_eq!(
            uris,
            [
                "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
                "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
                "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
            ]
        );
    }

    #[test]
    fn default_authn_context_is_password_protected_transport() {
        assert!(AuthnContextClass::default()
            .uri()
            .ends_with("PasswordProtectedTransport"));
    }
}
