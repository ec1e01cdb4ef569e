//! SAML identity provider core.
//!
//! Turns an inbound HTTP-Redirect `AuthnRequest` into a signed, encoded
//! response for the relying application, and describes the provider in
//! metadata:
//!
//! - **Request decoding** - base64, raw DEFLATE and `AuthnRequest` parsing
//! - **Issuer validation** - exact match against the redirect URI allow-list
//! - **Response building** - SAML 2.0 and the legacy SAML 1.1 layout
//! - **Enveloped signatures** - RSA with a configurable digest
//! - **Encoding** - optional DEFLATE, base64, GET or POST delivery
//! - **Metadata** - signing certificate, name ID formats, SSO endpoint
//!
//! # Architecture
//!
//! - [`types`] - protocol constants, the decoded request and the element tree
//! - [`bindings`] - Redirect and POST bindings, delivery selection, encoding
//! - [`builder`] - response document builders
//! - [`signature`] - signing and verification
//! - [`metadata`] - IdP metadata
//! - [`pipeline`] - the [`SamlIdp`] facade composing every stage
//!
//! # Example
//!
//! ```rust,ignore
//! use sso_protocol_saml::{IdpConfig, ProtocolVersion, SamlIdp, SsoContext};
//!
//! let idp = SamlIdp::new(IdpConfig::from_env()?);
//! let ctx = SsoContext { application: &app, principal: &user, key: &key, host: "idp.example.com" };
//! let response = idp.respond(&saml_request, &ctx, ProtocolVersion::Saml20)?;
//! ```
//!
//! Every call is a pure transformation of its inputs; the provider keeps no
//! state between calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod metadata;
pub mod origin;
pub mod pipeline;
pub mod signature;
pub mod types;
pub mod validation;

pub use bindings::{decode_request, resolve_delivery, DeliveryTarget, EncodedResponse, HttpMethod};
pub use builder::{LegacyAttributeProfile, LegacyResponseBuilder, ResponseBuilder, ASSERTION_VALIDITY};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::IdpConfig;
pub use error::{SamlError, SamlResult};
pub use metadata::build_metadata;
pub use origin::Origins;
pub use pipeline::{ProtocolVersion, SamlIdp, SsoContext};
pub use signature::{verify_enveloped, DocumentSigner, SignatureConfig, XmlSigner};
pub use types::{AuthnRequest, XmlElement};
pub use validation::validate_issuer;

pub use sso_crypto::DigestAlgorithm;
