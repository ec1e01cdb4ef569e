//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use sso_crypto::{IdGenerator, SequentialIdGenerator};
use sso_model::{KeyMaterial, Principal, RelyingApplication};
use sso_protocol_saml::bindings::{decode_response_payload, encode_request};
use sso_protocol_saml::{EncodedResponse, FixedClock, IdpConfig, SamlIdp, XmlElement};
use tracing_subscriber::fmt::MakeWriter;

pub const KEY_PEM: &str = include_str!("../fixtures/idp-key.pem");
pub const CERT_PEM: &str = include_str!("../fixtures/idp-cert.pem");

pub const HOST: &str = "idp.example.com";

pub fn key_material() -> KeyMaterial {
    KeyMaterial::new(CERT_PEM, KEY_PEM)
}

pub fn public_key() -> Vec<u8> {
    let key = sso_crypto::private_key_der(KEY_PEM).expect("fixture key");
    sso_crypto::rsa_public_key_der(&key).expect("public key")
}

pub fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Application trusting `https://sp.example`, no reply URL, no compression.
pub fn application() -> RelyingApplication {
    RelyingApplication::new("acme", "portal")
        .with_redirect_uri("https://sp.example")
        .with_redirect_uri("https://sp.example/callback")
}

pub fn alice() -> Principal {
    Principal::new("acme", "alice")
        .with_email("alice@example.com")
        .with_display_name("Alice Liddell")
        .with_role("admin")
}

/// Builds and encodes an `AuthnRequest` the way a service provider would.
pub fn saml_request(id: &str, issuer: &str, acs_url: Option<&str>) -> String {
    let acs = acs_url
        .map(|url| format!(r#" AssertionConsumerServiceURL="{url}""#))
        .unwrap_or_default();
    let xml = format!(
        r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="{id}" Version="2.0" IssueInstant="2024-01-01T11:59:58Z"{acs}><saml:Issuer>{issuer}</saml:Issuer><samlp:NameIDPolicy Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress"/></samlp:AuthnRequest>"#
    );
    encode_request(&xml).expect("encode request")
}

/// Provider with a frozen clock and `_id1`, `_id2`, ... identifiers.
pub fn deterministic_idp(config: IdpConfig) -> SamlIdp {
    SamlIdp::new(config)
        .with_clock(FixedClock(issued_at()))
        .with_id_generator(SequentialIdGenerator::new("_id"))
}

pub fn response_xml(encoded: &EncodedResponse) -> String {
    let bytes = decode_response_payload(&encoded.payload, encoded.compressed).expect("payload");
    String::from_utf8(bytes).expect("utf-8 response")
}

pub fn response_tree(encoded: &EncodedResponse) -> XmlElement {
    XmlElement::parse(&response_xml(encoded)).expect("well-formed response")
}

/// Identifier source that records how many identifiers were drawn.
#[derive(Debug, Clone, Default)]
pub struct CountingIds(pub Arc<AtomicUsize>);

impl IdGenerator for CountingIds {
    fn next_id(&self) -> String {
        let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        format!("_n{n}")
    }
}

impl CountingIds {
    pub fn drawn(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Log sink shared between a test and the subscriber writing into it.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a plain-text subscriber and returns its result and output.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}
