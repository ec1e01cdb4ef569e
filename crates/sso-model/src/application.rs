//! Relying application model.
//!
//! A relying application is a service provider registered with the IdP. Its
//! redirect URIs double as the issuer allow-list and the audience list.

use serde::{Deserialize, Serialize};

/// A registered service provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelyingApplication {
    /// Organization that owns the application.
    pub owner: String,
    /// Application name, unique within the owner.
    pub name: String,
    /// Allow-listed issuer URLs, in configuration order.
    pub redirect_uris: Vec<String>,
    /// Forced assertion consumer URL. Empty means unset.
    pub reply_url: Option<String>,
    /// Deflate the response before base64 encoding.
    pub compression_enabled: bool,
}

impl RelyingApplication {
    /// Creates an application with no redirect URIs.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an allow-listed redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    /// Forces responses to a fixed consumer URL.
    #[must_use]
    pub fn with_reply_url(mut self, url: impl Into<String>) -> Self {
        self.reply_url = Some(url.into());
        self
    }

    /// Enables or disables response compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.compression_enabled = enabled;
        self
    }

    /// Returns the forced reply URL, treating an empty string as unset.
    #[must_use]
    pub fn reply_url(&self) -> Option<&str> {
        self.reply_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Checks whether `issuer` exactly matches a redirect URI.
    #[must_use]
    pub fn allows_issuer(&self, issuer: &str) -> bool {
        self.redirect_uris.iter().any(|uri| uri == issuer)
    }
}
