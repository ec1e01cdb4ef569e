//! Response encoding.
//!
//! Serializes a signed document, optionally deflates it and base64-encodes
//! the result for delivery.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SamlResult;
use crate::types::XmlElement;

use super::{
    deflate_compress, deflate_decompress, post_form, redirect_url, DeliveryTarget, HttpMethod,
    SamlMessageType,
};

/// Upper bound when inflating a response payload for inspection (16 MiB).
const MAX_RESPONSE_SIZE: u64 = 16 * 1024 * 1024;

/// An encoded response ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedResponse {
    /// Base64 of the (possibly deflated) serialized document.
    pub payload: String,
    /// Consumer URL.
    pub destination: String,
    /// Delivery method.
    pub method: HttpMethod,
    /// Whether the payload was deflated before encoding.
    pub compressed: bool,
}

impl EncodedResponse {
    /// Builds the redirect URL carrying this response.
    #[must_use]
    pub fn redirect_url(&self, relay_state: Option<&str>) -> String {
        redirect_url(
            &self.destination,
            SamlMessageType::Response,
            &self.payload,
            relay_state,
        )
    }

    /// Renders the auto-submitting form carrying this response.
    #[must_use]
    pub fn post_form(&self, relay_state: Option<&str>) -> String {
        post_form(
            &self.destination,
            SamlMessageType::Response,
            &self.payload,
            relay_state,
        )
    }
}

/// Encodes serialized document bytes.
///
/// # Errors
///
/// Returns [`crate::SamlError::Compression`] if deflating fails.
pub fn encode_payload(bytes: &[u8], compress: bool) -> SamlResult<String> {
    if compress {
        Ok(STANDARD.encode(deflate_compress(bytes)?))
    } else {
        Ok(STANDARD.encode(bytes))
    }
}

/// Serializes and encodes a signed response document.
///
/// # Errors
///
/// Returns [`crate::SamlError::Serialization`] if the tree cannot be written and
/// [`crate::SamlError::Compression`] if deflating fails.
pub fn encode_response(
    document: &XmlElement,
    target: DeliveryTarget,
    compress: bool,
) -> SamlResult<EncodedResponse> {
    let xml = document.to_xml()?;
    let payload = encode_payload(xml.as_bytes(), compress)?;

    debug!(
        destination = %target.destination,
        method = %target.method,
        compressed = compress,
        size = payload.len(),
        "encoded response"
    );

    Ok(EncodedResponse {
        payload,
        destination: target.destination,
        method: target.method,
        compressed: compress,
    })
}

/// Reverses [`encode_payload`].
///
/// # Errors
///
/// Returns [`crate::SamlError::Decode`] for bad base64 or a corrupt DEFLATE stream.
pub fn decode_response_payload(payload: &str, compressed: bool) -> SamlResult<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    if compressed {
        deflate_decompress(&bytes, MAX_RESPONSE_SIZE)
    } else {
        Ok(bytes)
    }
}
