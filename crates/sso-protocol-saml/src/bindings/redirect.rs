//! HTTP-Redirect binding.
//!
//! Decodes inbound `SAMLRequest` values and builds redirect URLs for
//! responses delivered by GET.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{SamlError, SamlResult};
use crate::types::AuthnRequest;

use super::{deflate_compress, deflate_decompress, SamlMessageType};

/// Maximum encoded size of an inbound `SAMLRequest` (128 KiB).
pub const MAX_ENCODED_SIZE: usize = 128 * 1024;

/// Maximum inflated size of an inbound `SAMLRequest` (64 KiB).
pub const MAX_DECOMPRESSED_SIZE: u64 = 64 * 1024;

/// Decodes a redirect-binding `SAMLRequest` into request XML.
///
/// Whitespace is ignored and a percent-encoded value is unescaped first.
///
/// # Errors
///
/// Returns [`SamlError::Decode`] for oversized input, bad base64 or a corrupt
/// DEFLATE stream, and [`SamlError::MalformedRequest`] when the inflated bytes
/// are not UTF-8.
pub fn decode_request_xml(encoded: &str) -> SamlResult<String> {
    if encoded.len() > MAX_ENCODED_SIZE {
        return Err(SamlError::Decode(format!(
            "encoded request exceeds maximum size ({} > {MAX_ENCODED_SIZE} bytes)",
            encoded.len()
        )));
    }

    let unescaped = if encoded.contains('%') {
        urlencoding::decode(encoded)
            .map_err(|e| SamlError::Decode(format!("URL decode error: {e}")))?
            .into_owned()
    } else {
        encoded.to_string()
    };
    let compact: String = unescaped.chars().filter(|c| !c.is_whitespace()).collect();

    let deflated = STANDARD.decode(compact.as_bytes())?;
    let xml_bytes = deflate_decompress(&deflated, MAX_DECOMPRESSED_SIZE)?;

    String::from_utf8(xml_bytes)
        .map_err(|e| SamlError::MalformedRequest(format!("invalid UTF-8 in request: {e}")))
}

/// Decodes and parses a redirect-binding `SAMLRequest`.
///
/// # Errors
///
/// See [`decode_request_xml`] and [`AuthnRequest::parse_xml`].
pub fn decode_request(encoded: &str) -> SamlResult<AuthnRequest> {
    let xml = decode_request_xml(encoded)?;
    let request = AuthnRequest::parse_xml(&xml)?;
    debug!(request_id = %request.id, issuer = %request.issuer, "decoded AuthnRequest");
    Ok(request)
}

/// Deflates and base64-encodes a request, as a service provider would.
///
/// # Errors
///
/// Returns [`SamlError::Compression`] if deflating fails.
pub fn encode_request(xml: &str) -> SamlResult<String> {
    let compressed = deflate_compress(xml.as_bytes())?;
    Ok(STANDARD.encode(compressed))
}

/// Appends a binding message and optional relay state to `destination`.
#[must_use]
pub fn redirect_url(
    destination: &str,
    message_type: SamlMessageType,
    payload: &str,
    relay_state: Option<&str>,
) -> String {
    let separator = if destination.contains('?') { '&' } else { '?' };
    let mut url = format!(
        "{destination}{separator}{}={}",
        message_type.form_param(),
        urlencoding::encode(payload)
    );

    if let Some(rs) = relay_state {
        url.push_str("&RelayState=");
        url.push_str(&urlencoding::encode(rs));
    }

    url
}
