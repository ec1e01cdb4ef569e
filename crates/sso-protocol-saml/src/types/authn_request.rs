//! SAML AuthnRequest types.
//!
//! Authentication request message sent by a service provider to the identity
//! provider. Only the fields the provider acts on are captured.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};

use super::SamlBinding;

/// Decoded SAML authentication request. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnRequest {
    /// Unique identifier of the request; echoed as `InResponseTo`.
    pub id: String,

    /// Entity ID of the requesting service provider.
    pub issuer: String,

    /// The URL where the response should be sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_consumer_service_url: Option<String>,

    /// The URL the request was addressed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Binding requested for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_binding: Option<String>,

    /// Issue instant exactly as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<String>,

    /// Whether the IdP must authenticate the user directly.
    #[serde(default)]
    pub force_authn: bool,

    /// Whether the IdP must not interact with the user.
    #[serde(default)]
    pub is_passive: bool,

    /// Requested `NameIDPolicy` format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id_format: Option<String>,
}

impl AuthnRequest {
    /// Creates a request with only the required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            issuer: issuer.into(),
            assertion_consumer_service_url: None,
            destination: None,
            protocol_binding: None,
            issue_instant: None,
            force_authn: false,
            is_passive: false,
            name_id_format: None,
        }
    }

    /// Sets the assertion consumer service URL.
    #[must_use]
    pub fn with_acs_url(mut self, url: impl Into<String>) -> Self {
        self.assertion_consumer_service_url = Some(url.into());
        self
    }

    /// Returns the consumer URL, treating an empty value as absent.
    #[must_use]
    pub fn acs_url(&self) -> Option<&str> {
        self.assertion_consumer_service_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Returns the parsed protocol binding.
    #[must_use]
    pub fn parsed_binding(&self) -> Option<SamlBinding> {
        self.protocol_binding.as_deref().and_then(SamlBinding::from_uri)
    }

    /// Parses an `AuthnRequest` document.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedRequest`] if the XML is not well-formed,
    /// the root is not an `AuthnRequest`, or `ID` or `Issuer` is missing.
    pub fn parse_xml(xml: &str) -> SamlResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut request: Option<Self> = None;
        let mut issuer: Option<String> = None;
        let mut depth = 0usize;
        let mut in_issuer = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| SamlError::MalformedRequest(format!("XML parse error: {e}")))?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = e.local_name();
                    let name = std::str::from_utf8(name.as_ref()).unwrap_or("");

                    match depth {
                        0 => {
                            if request.is_some() {
                                return Err(SamlError::MalformedRequest(
                                    "multiple root elements".to_string(),
                                ));
                            }
                            if name != "AuthnRequest" {
                                return Err(SamlError::MalformedRequest(format!(
                                    "expected AuthnRequest root, found {name}"
                                )));
                            }
                            request = Some(read_root_attributes(e)?);
                        }
                        1 if name == "Issuer" => {
                            if issuer.is_some() {
                                return Err(SamlError::MalformedRequest(
                                    "multiple Issuer elements".to_string(),
                                ));
                            }
                            issuer = Some(String::new());
                            in_issuer = !is_empty;
                        }
                        1 if name == "NameIDPolicy" => {
                            if let Some(req) = request.as_mut() {
                                req.name_id_format = attribute(e, "Format")?;
                            }
                        }
                        _ => {}
                    }

                    if !is_empty {
                        depth += 1;
                    }
                }
                Event::Text(e) => {
                    if in_issuer {
                        let text = e
                            .unescape()
                            .map_err(|e| SamlError::MalformedRequest(format!("bad text: {e}")))?;
                        issuer.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if in_issuer {
                        let text = std::str::from_utf8(&e)
                            .map_err(|e| SamlError::MalformedRequest(format!("bad CDATA: {e}")))?;
                        issuer.get_or_insert_with(String::new).push_str(text);
                    }
                }
                Event::End(_) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        SamlError::MalformedRequest("unbalanced end tag".to_string())
                    })?;
                    in_issuer = false;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(SamlError::MalformedRequest("unclosed element".to_string()));
        }

        let mut request =
            request.ok_or_else(|| SamlError::MalformedRequest("empty document".to_string()))?;

        if request.id.is_empty() {
            return Err(SamlError::MalformedRequest("missing ID attribute".to_string()));
        }

        request.issuer = issuer
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SamlError::MalformedRequest("missing Issuer element".to_string()))?;

        Ok(request)
    }
}

fn attribute(e: &BytesStart<'_>, key: &str) -> SamlResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| SamlError::MalformedRequest(format!("bad attribute: {e}")))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| SamlError::MalformedRequest(format!("bad attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn read_root_attributes(e: &BytesStart<'_>) -> SamlResult<AuthnRequest> {
    let mut request = AuthnRequest::new(String::new(), String::new());

    for attr in e.attributes() {
        let attr = attr.map_err(|e| SamlError::MalformedRequest(format!("bad attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| SamlError::MalformedRequest(format!("bad attribute value: {e}")))?
            .into_owned();

        match attr.key.as_ref() {
            b"ID" => request.id = value,
            b"AssertionConsumerServiceURL" => {
                request.assertion_consumer_service_url = Some(value).filter(|v| !v.is_empty());
            }
            b"Destination" => request.destination = Some(value),
            b"ProtocolBinding" => request.protocol_binding = Some(value),
            b"IssueInstant" => request.issue_instant = Some(value),
            b"ForceAuthn" => request.force_authn = value == "true" || value == "1",
            b"IsPassive" => request.is_passive = value == "true" || value == "1",
            _ => {}
        }
    }

    Ok(request)
}
