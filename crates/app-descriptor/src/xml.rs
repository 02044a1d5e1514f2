// crates/app-descriptor/src/xml.rs
// ============================================================================
// Module: XML Tree Reader
// Description: Bounded reader that turns XML markup into an element tree.
// Purpose: Give descriptor binding a generic tree with attributes and text.
// Dependencies: quick-xml
// ============================================================================

//! ## Overview
//! [`read_document`] drives a `quick-xml` event reader and assembles a single
//! root [`XmlElement`]. Element and attribute names are matched by local name,
//! so namespaced descriptors bind the same way as unqualified ones. Comments,
//! processing instructions and the XML declaration are skipped. Only XML
//! whitespace may appear outside the root element.

// ============================================================================
// SECTION: Imports
// ============================================================================

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;

use crate::error::MalformedDescriptorError;
use crate::limits::ParseLimits;

// ============================================================================
// SECTION: Element Tree
// ============================================================================

/// A parsed XML element with its attributes, children and direct text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local element name.
    name: String,
    /// Attributes as (local name, unescaped value) in document order.
    attributes: Vec<(String, String)>,
    /// Child elements in document order.
    children: Vec<XmlElement>,
    /// Concatenated direct text and CDATA content.
    text: String,
}

impl XmlElement {
    /// Creates an element with no attributes, children or text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Returns the local element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the element's direct text, trimmed of surrounding whitespace.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Returns the named attribute value, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Returns the named attribute value, or an empty string when absent.
    #[must_use]
    pub fn attribute_or_empty(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or_default()
    }

    /// Returns all child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Returns every child element with the given name in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends text content.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }
}

// ============================================================================
// SECTION: Reader
// ============================================================================

/// Reads a complete XML document into its root element.
///
/// # Errors
///
/// Returns [`MalformedDescriptorError`] when the markup is not well formed,
/// has no single root element, or nests deeper than `limits.max_depth`.
pub fn read_document(
    input: &str,
    limits: &ParseLimits,
) -> Result<XmlElement, MalformedDescriptorError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|err| xml_error(&reader, &err))?;
        match event {
            Event::Start(start) => {
                let element = open_element(&reader, &start, &stack, root.as_ref(), limits)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, &start, &stack, root.as_ref(), limits)?;
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(MalformedDescriptorError::Xml {
                        position: reader.buffer_position(),
                        message: "unmatched end tag".to_string(),
                    });
                };
                attach(element, &mut stack, &mut root);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let value = text.unescape().map_err(|err| xml_error(&reader, &err))?;
                    current.text.push_str(&value);
                } else if !text.iter().all(|byte| is_xml_whitespace(*byte)) {
                    return Err(outside_root(&reader));
                }
            }
            Event::CData(data) => {
                let Some(current) = stack.last_mut() else {
                    return Err(outside_root(&reader));
                };
                let value = std::str::from_utf8(&data)
                    .map_err(|err| MalformedDescriptorError::Encoding(err.to_string()))?;
                current.text.push_str(value);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MalformedDescriptorError::UnclosedElement(open.name));
    }
    root.ok_or(MalformedDescriptorError::MissingRoot)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an element from a start tag after checking root and depth bounds.
fn open_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    stack: &[XmlElement],
    root: Option<&XmlElement>,
    limits: &ParseLimits,
) -> Result<XmlElement, MalformedDescriptorError> {
    let name = utf8(start.local_name().as_ref())?.to_string();
    if stack.is_empty() && root.is_some() {
        return Err(MalformedDescriptorError::MultipleRoots(name));
    }
    if stack.len() >= limits.max_depth {
        return Err(MalformedDescriptorError::TooDeep {
            limit: limits.max_depth,
        });
    }
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| MalformedDescriptorError::Xml {
            position: reader.buffer_position(),
            message: err.to_string(),
        })?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = utf8(attribute.key.local_name().as_ref())?.to_string();
        let value = attribute.unescape_value().map_err(|err| xml_error(reader, &err))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

/// Attaches a closed element to its parent, or installs it as the root.
fn attach(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Returns true for the four whitespace bytes XML allows between markup.
const fn is_xml_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Error for character data that sits before or after the root element.
fn outside_root(reader: &Reader<&[u8]>) -> MalformedDescriptorError {
    MalformedDescriptorError::Xml {
        position: reader.buffer_position(),
        message: "text outside root element".to_string(),
    }
}

/// Decodes a name slice as UTF-8.
fn utf8(bytes: &[u8]) -> Result<&str, MalformedDescriptorError> {
    std::str::from_utf8(bytes).map_err(|err| MalformedDescriptorError::Encoding(err.to_string()))
}

/// Maps a reader error to a positioned malformed-descriptor error.
fn xml_error(reader: &Reader<&[u8]>, err: &quick_xml::Error) -> MalformedDescriptorError {
    MalformedDescriptorError::Xml {
        position: reader.error_position(),
        message: err.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
