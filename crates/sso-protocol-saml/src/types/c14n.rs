//! Exclusive XML canonicalization (`xml-exc-c14n#`, without comments).
//!
//! Digests and signatures are computed over this form, which is what a
//! relying party recomputes after parsing the delivered document:
//!
//! - namespace declarations appear only on elements that visibly use the
//!   prefix and whose nearest rendered ancestor does not already bind it
//! - declarations are sorted by prefix, attributes by namespace URI then
//!   local name
//! - empty elements are written as a start/end pair
//! - text and attribute values use the canonical escapes

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SamlResult;

use super::xml::{check_xml_chars, XmlElement, XmlNode};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

type Bindings<'a> = BTreeMap<&'a str, &'a str>;

/// Canonicalizes a standalone element.
///
/// # Errors
///
/// Returns [`crate::SamlError::Serialization`] if any name, attribute value
/// or text contains characters XML 1.0 cannot represent.
pub fn canonicalize(element: &XmlElement) -> SamlResult<String> {
    canonicalize_in(element, std::iter::empty())
}

/// Canonicalizes an element that sits inside a larger document.
///
/// `inherited` lists the namespace declarations (`xmlns` / `xmlns:p`
/// attributes) of its ancestors, outermost first. They are rendered on the
/// element only where it uses them.
///
/// # Errors
///
/// Same as [`canonicalize`].
pub fn canonicalize_in<'a>(
    element: &'a XmlElement,
    inherited: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> SamlResult<String> {
    let mut scope = Bindings::new();
    for (key, value) in inherited {
        if let Some(prefix) = declared_prefix(key) {
            scope.insert(prefix, value);
        }
    }

    let mut out = String::new();
    write_element(element, &scope, &Bindings::new(), &mut out)?;
    Ok(out)
}

fn write_element<'a>(
    element: &'a XmlElement,
    in_scope: &Bindings<'a>,
    rendered: &Bindings<'a>,
    out: &mut String,
) -> SamlResult<()> {
    check_xml_chars(element.name())?;

    let mut scope = in_scope.clone();
    let mut attributes = Vec::new();
    for (key, value) in element.attributes() {
        check_xml_chars(key)?;
        check_xml_chars(value)?;
        match declared_prefix(key) {
            Some(prefix) => {
                scope.insert(prefix, value);
            }
            None => attributes.push((key, value)),
        }
    }

    let mut used = BTreeSet::new();
    used.insert(prefix_of(element.name()));
    for (key, _) in &attributes {
        if let Some((prefix, _)) = key.split_once(':') {
            used.insert(prefix);
        }
    }
    used.remove("xml");

    let mut now_rendered = rendered.clone();
    out.push('<');
    out.push_str(element.name());
    for prefix in used {
        let uri = match scope.get(prefix) {
            Some(uri) => *uri,
            None if prefix.is_empty() => "",
            // Unbound prefixes have nothing to render.
            None => continue,
        };
        if rendered.get(prefix).copied().unwrap_or("") == uri {
            continue;
        }
        if prefix.is_empty() {
            out.push_str(" xmlns=\"");
        } else {
            out.push_str(" xmlns:");
            out.push_str(prefix);
            out.push_str("=\"");
        }
        escape_attribute(uri, out);
        out.push('"');
        now_rendered.insert(prefix, uri);
    }

    attributes.sort_by(|(a, _), (b, _)| sort_key(a, &scope).cmp(&sort_key(b, &scope)));
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(value, out);
        out.push('"');
    }
    out.push('>');

    for node in element.nodes() {
        match node {
            XmlNode::Element(child) => write_element(child, &scope, &now_rendered, out)?,
            XmlNode::Text(text) => {
                check_xml_chars(text)?;
                escape_text(text, out);
            }
        }
    }

    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
    Ok(())
}

/// Prefix bound by a namespace declaration attribute, `""` for the default
/// namespace, `None` for ordinary attributes.
fn declared_prefix(key: &str) -> Option<&str> {
    if key == "xmlns" {
        Some("")
    } else {
        key.strip_prefix("xmlns:")
    }
}

/// Namespace URI and local name of an attribute. Unqualified attributes
/// have no namespace and sort first.
fn sort_key<'a>(key: &'a str, scope: &Bindings<'a>) -> (&'a str, &'a str) {
    match key.split_once(':') {
        Some(("xml", local)) => (XML_NS, local),
        Some((prefix, local)) => (scope.get(prefix).copied().unwrap_or(prefix), local),
        None => ("", key),
    }
}

fn prefix_of(name: &str) -> &str {
    name.split_once(':').map_or("", |(prefix, _)| prefix)
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SamlError;

    #[test]
    fn sorts_attributes_and_moves_declarations_to_their_users() {
        let element = XmlElement::new("samlp:Response")
            .attr("xmlns:samlp", "urn:p")
            .attr("xmlns:saml", "urn:a")
            .attr("Version", "2.0")
            .attr("ID", "_1")
            .child(XmlElement::new("saml:Issuer").text("https://idp.example"))
            .child(XmlElement::new("saml:Assertion").child(XmlElement::new("saml:Issuer")));

        assert_eq!(
            canonicalize(&element).unwrap(),
            concat!(
                r#"<samlp:Response xmlns:samlp="urn:p" ID="_1" Version="2.0">"#,
                r#"<saml:Issuer xmlns:saml="urn:a">https://idp.example</saml:Issuer>"#,
                r#"<saml:Assertion xmlns:saml="urn:a"><saml:Issuer></saml:Issuer></saml:Assertion>"#,
                "</samlp:Response>"
            )
        );
    }

    #[test]
    fn drops_declarations_nothing_uses() {
        let element = XmlElement::new("saml:Assertion")
            .attr("xmlns:saml", "urn:a")
            .attr("xmlns:xs", "urn:xs")
            .attr("xmlns:xsi", "urn:xsi")
            .child(XmlElement::new("saml:AttributeValue").attr("xsi:type", "xs:string").text("v"));

        assert_eq!(
            canonicalize(&element).unwrap(),
            concat!(
                r#"<saml:Assertion xmlns:saml="urn:a">"#,
                r#"<saml:AttributeValue xmlns:xsi="urn:xsi" xsi:type="xs:string">v</saml:AttributeValue>"#,
                "</saml:Assertion>"
            )
        );
    }

    #[test]
    fn qualified_attributes_sort_by_namespace_uri() {
        let element = XmlElement::new("e")
            .attr("xmlns:b", "urn:b")
            .attr("xmlns:a", "urn:z")
            .attr("a:y", "1")
            .attr("b:x", "2")
            .attr("plain", "3");

        assert_eq!(
            canonicalize(&element).unwrap(),
            r#"<e xmlns:a="urn:z" xmlns:b="urn:b" plain="3" b:x="2" a:y="1"></e>"#
        );
    }

    #[test]
    fn default_namespace_is_rendered_and_undeclared() {
        let element = XmlElement::new("Response")
            .attr("xmlns", "urn:p")
            .child(XmlElement::new("Assertion").attr("xmlns", "urn:a"))
            .child(XmlElement::new("Status").attr("xmlns", "urn:p"))
            .child(XmlElement::new("Extensions").attr("xmlns", ""));

        assert_eq!(
            canonicalize(&element).unwrap(),
            concat!(
                r#"<Response xmlns="urn:p">"#,
                r#"<Assertion xmlns="urn:a"></Assertion>"#,
                "<Status></Status>",
                r#"<Extensions xmlns=""></Extensions>"#,
                "</Response>"
            )
        );
    }

    #[test]
    fn uses_canonical_escapes() {
        let element = XmlElement::new("a")
            .attr("v", "x\"<>&\t\n")
            .text("1 > 0 & \"q\" 'a'\r");

        assert_eq!(
            canonicalize(&element).unwrap(),
            r#"<a v="x&quot;&lt;>&amp;&#x9;&#xA;">1 &gt; 0 &amp; "q" 'a'&#xD;</a>"#
        );
    }

    #[test]
    fn inherited_bindings_render_where_used() {
        let signed_info = XmlElement::new("ds:SignedInfo")
            .child(XmlElement::new("ds:SignatureMethod").attr("Algorithm", "urn:alg"));

        assert_eq!(
            canonicalize_in(&signed_info, [("xmlns:ds", "urn:ds"), ("xmlns:saml", "urn:a")]).unwrap(),
            r#"<ds:SignedInfo xmlns:ds="urn:ds"><ds:SignatureMethod Algorithm="urn:alg"></ds:SignatureMethod></ds:SignedInfo>"#
        );
    }

    #[test]
    fn rejects_characters_outside_xml() {
        let element = XmlElement::new("a").text("bad\u{1}");
        assert!(matches!(canonicalize(&element), Err(SamlError::Serialization(_))));
    }
}
