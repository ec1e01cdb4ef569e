//! The response pipeline.
//!
//! `Decoded → IssuerValidated → DestinationResolved → Built → Signed →
//! Encoded`. Each stage either hands its output to the next or ends the run
//! with an error; nothing is retried and no partial document escapes.

use serde::{Deserialize, Serialize};
use sso_crypto::{IdGenerator, RandomIdGenerator};
use sso_model::{AssignedRoles, KeyMaterial, Principal, RelyingApplication, RoleResolver};
use tracing::{debug, error, warn};

use crate::bindings::{decode_request, encode_response, resolve_delivery, EncodedResponse};
use crate::builder::{LegacyResponseBuilder, ResponseBuilder};
use crate::clock::{Clock, SystemClock};
use crate::config::IdpConfig;
use crate::error::SamlResult;
use crate::metadata::build_metadata;
use crate::origin::Origins;
use crate::signature::{DocumentSigner, XmlSigner};
use crate::validation::{audiences, validate_issuer};

/// Response schema to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// SAML 2.0.
    #[default]
    #[serde(rename = "2.0")]
    Saml20,
    /// SAML 1.1, for legacy relying parties.
    #[serde(rename = "1.1")]
    Saml11,
}

impl ProtocolVersion {
    /// Returns the version string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Saml20 => "2.0",
            Self::Saml11 => "1.1",
        }
    }
}

/// Everything a single sign-on call needs from external collaborators.
#[derive(Debug, Clone, Copy)]
pub struct SsoContext<'a> {
    /// The relying application the request is for.
    pub application: &'a RelyingApplication,
    /// The authenticated user.
    pub principal: &'a Principal,
    /// Certificate and key the application signs with.
    pub key: &'a KeyMaterial,
    /// `Host` the request arrived on.
    pub host: &'a str,
}

/// SAML identity provider.
///
/// Stateless between calls; share it behind an `Arc` to serve concurrent
/// requests.
pub struct SamlIdp {
    config: IdpConfig,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    roles: Box<dyn RoleResolver>,
    signer: Box<dyn DocumentSigner>,
}

impl std::fmt::Debug for SamlIdp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamlIdp")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for SamlIdp {
    fn default() -> Self {
        Self::new(IdpConfig::default())
    }
}

impl SamlIdp {
    /// Creates a provider with the system clock, random identifiers, the
    /// principal's own roles and an [`XmlSigner`] built from `config`.
    #[must_use]
    pub fn new(config: IdpConfig) -> Self {
        let signer = XmlSigner::new(config.signature_config());
        Self {
            config,
            clock: Box::new(SystemClock),
            ids: Box::new(RandomIdGenerator),
            roles: Box::new(AssignedRoles),
            signer: Box::new(signer),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the identifier source.
    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Replaces the role resolver.
    #[must_use]
    pub fn with_role_resolver(mut self, roles: impl RoleResolver + 'static) -> Self {
        self.roles = Box::new(roles);
        self
    }

    /// Replaces the document signer.
    #[must_use]
    pub fn with_signer(mut self, signer: impl DocumentSigner + 'static) -> Self {
        self.signer = Box::new(signer);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &IdpConfig {
        &self.config
    }

    /// Answers an HTTP-Redirect `SAMLRequest` with a signed, encoded response.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails: decoding, issuer
    /// validation, destination resolution, building, signing or encoding.
    pub fn respond(
        &self,
        saml_request: &str,
        ctx: &SsoContext<'_>,
        version: ProtocolVersion,
    ) -> SamlResult<EncodedResponse> {
        let request = decode_request(saml_request)?;

        if let Err(e) = validate_issuer(&request, ctx.application) {
            warn!(request_id = %request.id, issuer = %request.issuer, "issuer rejected");
            return Err(e);
        }
        debug!(request_id = %request.id, issuer = %request.issuer, "issuer validated");

        let target = match resolve_delivery(ctx.application, &request) {
            Ok(target) => target,
            Err(e) => {
                warn!(request_id = %request.id, "no destination for response");
                return Err(e);
            }
        };
        debug!(
            request_id = %request.id,
            destination = %target.destination,
            method = %target.method,
            "destination resolved"
        );

        let origins = Origins::from_host(ctx.host, &self.config);
        let now = self.clock.now();
        let built = match version {
            ProtocolVersion::Saml20 => ResponseBuilder::new(&request, ctx.principal)
                .issuer(&origins.backend)
                .destination(&target.destination)
                .audiences(audiences(&request, ctx.application))
                .issue_instant(now)
                .roles_separator(&self.config.roles_separator)
                .build(self.ids.as_ref(), self.roles.as_ref()),
            ProtocolVersion::Saml11 => LegacyResponseBuilder::new(&request.id, ctx.principal)
                .issuer(&origins.backend)
                .issue_instant(now)
                .build(self.ids.as_ref()),
        };
        let document = match built {
            Ok(document) => document,
            Err(e) => {
                error!(request_id = %request.id, version = version.as_str(), error = %e, "failed to build response");
                return Err(e);
            }
        };
        debug!(request_id = %request.id, version = version.as_str(), "response built");

        let signed = match self.signer.sign(document, ctx.key) {
            Ok(signed) => signed,
            Err(e) => {
                error!(request_id = %request.id, error = %e, "failed to sign response");
                return Err(e);
            }
        };
        debug!(request_id = %request.id, "response signed");

        match encode_response(&signed, target, ctx.application.compression_enabled) {
            Ok(encoded) => Ok(encoded),
            Err(e) => {
                error!(request_id = %request.id, error = %e, "failed to encode response");
                Err(e)
            }
        }
    }

    /// Builds metadata for `application` as seen from `host`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::InvalidCertificate`] when the certificate
    /// in `key` cannot be decoded.
    pub fn metadata(
        &self,
        application: &RelyingApplication,
        key: &KeyMaterial,
        host: &str,
    ) -> SamlResult<String> {
        let origins = Origins::from_host(host, &self.config);
        build_metadata(application, &key.certificate_pem, &origins)
    }
}
