//! In-memory XML element tree.
//!
//! Response documents are assembled as a tree, handed to the signer by value
//! and serialized once at the end. Wire serialization is compact: no
//! indentation, attributes in insertion order, and empty elements written as
//! a start/end pair. Digests use the canonical form from [`super::c14n`].

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{SamlError, SamlResult};

/// XML declaration prepended to standalone documents.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Child element.
    Element(XmlElement),
    /// Character data, unescaped.
    Text(String),
}

/// An XML element with a qualified name, ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an element with a qualified name such as `saml:Issuer`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Appends several child elements.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children
            .extend(children.into_iter().map(XmlNode::Element));
        self
    }

    /// Appends a text node.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Returns the qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the local part of the name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Looks up an attribute by its qualified name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over attributes in insertion order, namespace declarations
    /// included.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns child nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[XmlNode] {
        &self.children
    }

    /// Iterates over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// Returns the first child element with the given local name.
    #[must_use]
    pub fn find(&self, local_name: &str) -> Option<&Self> {
        self.elements().find(|el| el.local_name() == local_name)
    }

    /// Concatenated text content of direct text children.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Returns the node index of the first child element with the given
    /// local name.
    #[must_use]
    pub fn position_of(&self, local_name: &str) -> Option<usize> {
        self.children.iter().position(
            |node| matches!(node, XmlNode::Element(el) if el.local_name() == local_name),
        )
    }

    /// Inserts a child element at a node index.
    pub fn insert_child(&mut self, index: usize, child: Self) {
        let index = index.min(self.children.len());
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Removes and returns the first child element with the given local name.
    pub fn remove_child(&mut self, local_name: &str) -> Option<Self> {
        let index = self.position_of(local_name)?;
        match self.children.remove(index) {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        }
    }

    /// Reads a document back into a tree.
    ///
    /// Text is kept verbatim, including whitespace. Declarations, comments
    /// and processing instructions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Serialization`] if the input is not a single
    /// well-formed element.
    pub fn parse(xml: &str) -> SamlResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| SamlError::Serialization(format!("XML parse error: {e}")))?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if root.is_some() {
                        return Err(SamlError::Serialization("content after root element".to_string()));
                    }
                    let element = element_from_start(e)?;
                    if matches!(event, Event::Empty(_)) {
                        close_element(&mut stack, &mut root, element);
                    } else {
                        stack.push(element);
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SamlError::Serialization("unbalanced end tag".to_string()))?;
                    close_element(&mut stack, &mut root, element);
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| SamlError::Serialization(format!("bad text: {e}")))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| SamlError::Serialization(format!("bad CDATA: {e}")))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text.to_string()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(SamlError::Serialization("unclosed element".to_string()));
        }
        root.ok_or_else(|| SamlError::Serialization("empty document".to_string()))
    }

    /// Serializes the tree to its compact form.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Serialization`] if any name, attribute value or
    /// text contains characters XML 1.0 cannot represent.
    pub fn to_xml(&self) -> SamlResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| SamlError::Serialization(format!("invalid UTF-8 in output: {e}")))
    }

    /// Serializes the tree with a leading XML declaration.
    ///
    /// # Errors
    ///
    /// Same as [`XmlElement::to_xml`].
    pub fn to_document(&self) -> SamlResult<String> {
        Ok(format!("{XML_DECLARATION}{}", self.to_xml()?))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> SamlResult<()> {
        check_xml_chars(&self.name)?;
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            check_xml_chars(key)?;
            check_xml_chars(value)?;
            start.push_attribute((key.as_str(), value.as_str()));
        }
        write_event(writer, Event::Start(start))?;

        for node in &self.children {
            match node {
                XmlNode::Element(el) => el.write(writer)?,
                XmlNode::Text(text) => {
                    check_xml_chars(text)?;
                    write_event(writer, Event::Text(BytesText::new(text)))?;
                }
            }
        }

        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

fn element_from_start(e: &BytesStart<'_>) -> SamlResult<XmlElement> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| SamlError::Serialization(format!("bad element name: {e}")))?
        .to_string();
    let mut element = XmlElement::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| SamlError::Serialization(format!("bad attribute: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| SamlError::Serialization(format!("bad attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| SamlError::Serialization(format!("bad attribute value: {e}")))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn close_element(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> SamlResult<()> {
    writer
        .write_event(event)
        .map_err(|e| SamlError::Serialization(format!("XML write error: {e}")))
}

/// Rejects characters outside the XML 1.0 `Char` production.
///
/// # Errors
///
/// Returns [`SamlError::Serialization`] naming the first offending code point.
pub fn check_xml_chars(value: &str) -> SamlResult<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(SamlError::Serialization(format!(
            "character U+{:04X} is not allowed in XML 1.0",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

const fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
