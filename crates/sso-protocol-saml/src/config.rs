//! Identity provider configuration.
//!
//! Configuration is deserializable from TOML and can be overridden from
//! environment variables with the defaults below as fallback.

use serde::{Deserialize, Serialize};
use sso_crypto::DigestAlgorithm;

use crate::error::{SamlError, SamlResult};
use crate::signature::SignatureConfig;

/// Identity provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdpConfig {
    /// Public origin forced for both frontend and backend.
    pub origin: Option<String>,

    /// Map the development backend port to the development frontend.
    pub dev_mode: bool,

    /// Digest used for signature references and the RSA signature method.
    pub digest_algorithm: DigestAlgorithm,

    /// Embed the signing certificate in `KeyInfo`.
    pub include_certificate: bool,

    /// Delimiter between role names in the `Roles` attribute.
    pub roles_separator: String,
}

impl Default for IdpConfig {
    fn default() -> Self {
        Self {
            origin: None,
            dev_mode: false,
            digest_algorithm: DigestAlgorithm::default(),
            include_certificate: true,
            roles_separator: ",".to_string(),
        }
    }
}

impl IdpConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Config`] when a variable holds a malformed value.
    pub fn from_env() -> SamlResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SSO_*` overrides read through `lookup` on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Config`] when a value is malformed.
    pub fn with_overrides<F>(mut self, lookup: F) -> SamlResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origin) = lookup("SSO_ORIGIN") {
            let origin = origin.trim().trim_end_matches('/').to_string();
            self.origin = Some(origin).filter(|o| !o.is_empty());
        }

        if let Some(value) = lookup("SSO_DEV_MODE") {
            self.dev_mode = parse_bool("SSO_DEV_MODE", &value)?;
        }

        if let Some(value) = lookup("SSO_DIGEST_ALGORITHM") {
            self.digest_algorithm = value
                .parse()
                .map_err(|e| SamlError::Config(format!("SSO_DIGEST_ALGORITHM: {e}")))?;
        }

        if let Some(value) = lookup("SSO_INCLUDE_CERTIFICATE") {
            self.include_certificate = parse_bool("SSO_INCLUDE_CERTIFICATE", &value)?;
        }

        Ok(self)
    }

    /// Returns the signer configuration derived from this config.
    #[must_use]
    pub const fn signature_config(&self) -> SignatureConfig {
        SignatureConfig {
            digest: self.digest_algorithm,
            include_certificate: self.include_certificate,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> SamlResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SamlError::Config(format!("{key}: expected a boolean, got {other:?}"))),
    }
}
