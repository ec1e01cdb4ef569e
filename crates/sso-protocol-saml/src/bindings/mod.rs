//! SAML bindings.
//!
//! Transport conventions for protocol messages:
//!
//! - **HTTP-Redirect** - the message is deflated, base64-encoded and carried
//!   in a query parameter
//! - **HTTP-POST** - the message is base64-encoded and carried in a form field
//!
//! Inbound requests always arrive deflated. Outbound responses are delivered
//! with the method chosen by [`resolve_delivery`].

mod encoder;
mod post;
mod redirect;

pub use encoder::*;
pub use post::*;
pub use redirect::*;

use std::fmt;
use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sso_model::RelyingApplication;

use crate::error::{SamlError, SamlResult};
use crate::types::AuthnRequest;

/// SAML message type for binding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamlMessageType {
    /// AuthnRequest message.
    Request,
    /// Response message.
    Response,
}

impl SamlMessageType {
    /// Returns the form parameter name for this message type.
    #[must_use]
    pub const fn form_param(&self) -> &'static str {
        match self {
            Self::Request => "SAMLRequest",
            Self::Response => "SAMLResponse",
        }
    }
}

/// HTTP method used to deliver a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Query parameter on a redirect.
    Get,
    /// Auto-submitted form field.
    Post,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how a response is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTarget {
    /// Consumer URL the response is addressed to.
    pub destination: String,
    /// Delivery method.
    pub method: HttpMethod,
}

/// Chooses the response destination and method.
///
/// A reply URL configured on the application wins and is delivered by POST,
/// even when the request names its own consumer URL. Otherwise the request's
/// consumer URL is used with GET.
///
/// # Errors
///
/// Returns [`SamlError::MissingDestination`] when neither is set.
pub fn resolve_delivery(
    application: &RelyingApplication,
    request: &AuthnRequest,
) -> SamlResult<DeliveryTarget> {
    if let Some(reply_url) = application.reply_url() {
        return Ok(DeliveryTarget {
            destination: reply_url.to_string(),
            method: HttpMethod::Post,
        });
    }

    if let Some(acs_url) = request.acs_url() {
        return Ok(DeliveryTarget {
            destination: acs_url.to_string(),
            method: HttpMethod::Get,
        });
    }

    Err(SamlError::MissingDestination(format!(
        "application {}/{} has no reply URL and request {} has no AssertionConsumerServiceURL",
        application.owner, application.name, request.id
    )))
}

/// Compresses data using DEFLATE (raw, no zlib header).
pub(crate) fn deflate_compress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| SamlError::Compression(format!("compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Compression(format!("compression finish error: {e}")))
}

/// Decompresses raw DEFLATE data, refusing output larger than `limit` bytes.
pub(crate) fn deflate_decompress(data: &[u8], limit: u64) -> SamlResult<Vec<u8>> {
    let decoder = DeflateDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .take(limit + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| SamlError::Decode(format!("inflate error: {e}")))?;

    if decompressed.len() as u64 > limit {
        return Err(SamlError::Decode(format!(
            "inflated message exceeds {limit} bytes"
        )));
    }
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(acs: Option<&str>) -> AuthnRequest {
        let request = AuthnRequest::new("req-1", "https://sp.example");
        match acs {
            Some(url) => request.with_acs_url(url),
            None => request,
        }
    }

    #[test]
    fn reply_url_forces_post() {
        let app = RelyingApplication::new("acme", "portal").with_reply_url("https://sp.example/forced");
        let target = resolve_delivery(&app, &request(Some("https://sp.example/acs"))).unwrap();

        assert_eq!(target.destination, "https://sp.example/forced");
        assert_eq!(target.method, HttpMethod::Post);
    }

    #[test]
    fn request_acs_uses_get() {
        let app = RelyingApplication::new("acme", "portal").with_reply_url("");
        let target = resolve_delivery(&app, &request(Some("https://sp.example/acs"))).unwrap();

        assert_eq!(target.destination, "https://sp.example/acs");
        assert_eq!(target.method, HttpMethod::Get);
    }

    #[test]
    fn neither_is_missing_destination() {
        let app = RelyingApplication::new("acme", "portal");
        assert!(matches!(
            resolve_delivery(&app, &request(None)),
            Err(SamlError::MissingDestination(_))
        ));
        assert!(matches!(
            resolve_delivery(&app, &request(Some(""))),
            Err(SamlError::MissingDestination(_))
        ));
    }

    #[test]
    fn deflate_roundtrip() {
        let original = b"Test data for compression";
        let compressed = deflate_compress(original).unwrap();
        let decompressed = deflate_decompress(&compressed, 1024).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn inflate_limit_is_enforced() {
        let compressed = deflate_compress(&[b'a'; 4096]).unwrap();
        assert!(deflate_decompress(&compressed, 4096).is_ok());
        assert!(matches!(
            deflate_decompress(&compressed, 4095),
            Err(SamlError::Decode(_))
        ));
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
