//! Signatures on produced responses, checked from the relying party's side.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::*;
use sso_crypto::DigestAlgorithm;
use sso_protocol_saml::types::{canonicalize, XMLDSIG_NS};
use sso_protocol_saml::{verify_enveloped, IdpConfig, ProtocolVersion, SsoContext, XmlElement};

/// Exclusive canonical form of the fixed-clock `req-1` response with its
/// signature removed, produced by an independent C14N implementation.
const CANONICAL_REQ_1: &str = include_str!("fixtures/response-req-1.c14n.xml");

fn signed_response(config: IdpConfig, version: ProtocolVersion) -> anyhow::Result<String> {
    let idp = deterministic_idp(config);
    let (app, user, key) = (application(), alice(), key_material());
    let ctx = SsoContext { application: &app, principal: &user, key: &key, host: HOST };
    let request = saml_request("req-1", "https://sp.example", Some("https://sp.example/acs"));
    Ok(response_xml(&idp.respond(&request, &ctx, version)?))
}

fn signature(xml: &str) -> XmlElement {
    XmlElement::parse(xml)
        .unwrap()
        .find("Signature")
        .cloned()
        .expect("signature element")
}

#[test]
fn signature_is_second_child_of_the_response() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml20)?;
    let root = XmlElement::parse(&xml)?;
    let names: Vec<&str> = root.elements().map(XmlElement::name).collect();

    assert_eq!(names, ["saml:Issuer", "ds:Signature", "samlp:Status", "saml:Assertion"]);
    assert_eq!(signature(&xml).attribute("xmlns:ds"), Some(XMLDSIG_NS));
    Ok(())
}

#[test]
fn default_signature_is_rsa_sha256_and_verifies() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml20)?;
    let signed_info = signature(&xml).find("SignedInfo").cloned().unwrap();

    assert_eq!(
        signed_info.find("SignatureMethod").and_then(|m| m.attribute("Algorithm")),
        Some(DigestAlgorithm::Sha256.rsa_signature_uri())
    );
    assert_eq!(
        signed_info.find("Reference").and_then(|r| r.attribute("URI")),
        Some("#_id1")
    );
    assert!(verify_enveloped(&xml, &public_key())?);
    Ok(())
}

#[test]
fn legacy_sha1_is_available_on_request() -> anyhow::Result<()> {
    let config = IdpConfig {
        digest_algorithm: DigestAlgorithm::Sha1,
        ..IdpConfig::default()
    };
    let xml = signed_response(config, ProtocolVersion::Saml20)?;

    assert_eq!(
        signature(&xml)
            .find("SignedInfo")
            .and_then(|s| s.find("SignatureMethod"))
            .and_then(|m| m.attribute("Algorithm")),
        Some("http://www.w3.org/2000/09/xmldsig#rsa-sha1")
    );
    assert!(verify_enveloped(&xml, &public_key())?);
    Ok(())
}

#[test]
fn embedded_certificate_matches_key_material() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml20)?;
    let embedded = signature(&xml)
        .find("KeyInfo")
        .and_then(|k| k.find("X509Data"))
        .and_then(|x| x.find("X509Certificate"))
        .map(XmlElement::text_content)
        .unwrap();

    assert_eq!(embedded, sso_crypto::certificate_base64(CERT_PEM)?);
    Ok(())
}

#[test]
fn certificate_can_be_left_out() -> anyhow::Result<()> {
    let config = IdpConfig {
        include_certificate: false,
        ..IdpConfig::default()
    };
    let xml = signed_response(config, ProtocolVersion::Saml20)?;

    assert!(signature(&xml).find("KeyInfo").is_none());
    assert!(verify_enveloped(&xml, &public_key())?);
    Ok(())
}

#[test]
fn legacy_response_signature_references_response_id() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml11)?;
    let reference = signature(&xml)
        .find("SignedInfo")
        .and_then(|s| s.find("Reference"))
        .cloned()
        .unwrap();

    assert_eq!(reference.attribute("URI"), Some("#_id1"));
    assert!(verify_enveloped(&xml, &public_key())?);
    Ok(())
}

#[test]
fn altered_assertion_no_longer_verifies() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml20)?;
    let forged = xml.replace("alice@example.com", "mallory@example.com");

    assert_ne!(xml, forged);
    assert!(!verify_enveloped(&forged, &public_key())?);
    Ok(())
}

#[test]
fn digest_covers_the_exclusive_canonical_form() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml20)?;
    let mut root = XmlElement::parse(&xml)?;
    let signature = root.remove_child("Signature").expect("signature element");
    let expected = CANONICAL_REQ_1.trim_end();

    assert_eq!(canonicalize(&root)?, expected);

    let digest_value = signature
        .find("SignedInfo")
        .and_then(|s| s.find("Reference"))
        .and_then(|r| r.find("DigestValue"))
        .map(XmlElement::text_content)
        .unwrap();
    assert_eq!(
        digest_value,
        STANDARD.encode(sso_crypto::sha256(expected.as_bytes()))
    );
    Ok(())
}

#[test]
fn signature_value_covers_canonical_signed_info() -> anyhow::Result<()> {
    let xml = signed_response(IdpConfig::default(), ProtocolVersion::Saml20)?;
    let signature = signature(&xml);
    let digest_value = STANDARD.encode(sso_crypto::sha256(CANONICAL_REQ_1.trim_end().as_bytes()));
    let signed_info = format!(
        concat!(
            r#"<ds:SignedInfo xmlns:ds="http://www.w3.org/2000/09/xmldsig#">"#,
            r#"<ds:CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"></ds:CanonicalizationMethod>"#,
            r#"<ds:SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"></ds:SignatureMethod>"#,
            r##"<ds:Reference URI="#_id1"><ds:Transforms>"##,
            r#"<ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"></ds:Transform>"#,
            r#"<ds:Transform Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"></ds:Transform>"#,
            r#"</ds:Transforms><ds:DigestMethod Algorithm="http://www.w3.org/2001/04/xmlenc#sha256"></ds:DigestMethod>"#,
            "<ds:DigestValue>{}</ds:DigestValue></ds:Reference></ds:SignedInfo>"
        ),
        digest_value
    );
    let signature_value = STANDARD.decode(
        signature
            .find("SignatureValue")
            .map(XmlElement::text_content)
            .unwrap(),
    )?;

    assert!(sso_crypto::rsa_verify(
        &public_key(),
        signed_info.as_bytes(),
        &signature_value,
        DigestAlgorithm::Sha256
    )?);
    Ok(())
}
