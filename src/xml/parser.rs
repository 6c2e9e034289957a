use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::{AgentError, AgentResult};

/// A parsed XML document: the document node maps the root tag to its
/// single occurrence.
pub type ParsedDocument = XmlNode;

/// Value stored under a tag key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Element without attributes or child elements.
    Text(String),
    /// Element with attributes or child elements.
    Node(XmlNode),
}

impl XmlValue {
    /// Text content of the element, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Node(node) => node.text(),
        }
    }

    pub fn as_node(&self) -> Option<&XmlNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }
}

/// An element's attributes, text, and children grouped by tag.
///
/// Every child tag maps to a sequence, even when it occurs once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<(String, Vec<XmlValue>)>,
}

impl XmlNode {
    /// All occurrences of `tag`, in document order. Empty when absent.
    pub fn all(&self, tag: &str) -> &[XmlValue] {
        self.children
            .iter()
            .find(|(name, _)| name == tag)
            .map_or(&[], |(_, values)| values.as_slice())
    }

    /// First occurrence of `tag`.
    pub fn first(&self, tag: &str) -> Option<&XmlValue> {
        self.all(tag).first()
    }

    /// Text of the first occurrence of `tag`.
    pub fn first_text(&self, tag: &str) -> Option<&str> {
        self.first(tag).and_then(XmlValue::as_text)
    }

    /// Node of the first occurrence of `tag`.
    pub fn first_node(&self, tag: &str) -> Option<&XmlNode> {
        self.first(tag).and_then(XmlValue::as_node)
    }

    /// Follow a dotted path, taking the first occurrence at every step.
    pub fn path(&self, dotted: &str) -> Option<&XmlValue> {
        let mut segments = dotted.split('.');
        let mut value = self.first(segments.next()?)?;
        for segment in segments {
            value = value.as_node()?.first(segment)?;
        }
        Some(value)
    }

    /// Child tag names in first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn push(&mut self, tag: String, value: XmlValue) {
        match self.children.iter_mut().find(|(name, _)| *name == tag) {
            Some((_, values)) => values.push(value),
            None => self.children.push((tag, vec![value])),
        }
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    fn into_value(self) -> XmlValue {
        if self.attributes.is_empty() && self.children.is_empty() {
            XmlValue::Text(self.text.unwrap_or_default())
        } else {
            XmlValue::Node(self)
        }
    }
}

/// Child tags become arrays, attributes go under `$`, text under `_`.
impl Serialize for XmlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.attributes.is_empty() {
            let attrs: BTreeMap<&str, &str> = self
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            map.serialize_entry("$", &attrs)?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry("_", text)?;
        }
        for (tag, values) in &self.children {
            map.serialize_entry(tag, values)?;
        }
        map.end()
    }
}

impl Serialize for XmlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Node(node) => node.serialize(serializer),
        }
    }
}

fn parse_err(e: impl std::fmt::Display) -> AgentError {
    AgentError::Parse(e.to_string())
}

fn open_element(e: &BytesStart<'_>) -> AgentResult<(String, XmlNode)> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(parse_err)?
        .to_string();
    let mut node = XmlNode::default();
    for attr in e.attributes() {
        let attr = attr.map_err(parse_err)?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(parse_err)?
            .to_string();
        let value = attr.unescape_value().map_err(parse_err)?.into_owned();
        node.attributes.push((key, value));
    }
    Ok((name, node))
}

/// Parse a complete XML document.
///
/// # Errors
///
/// Returns [`AgentError::Parse`] on syntax errors, mismatched or unclosed
/// tags, text outside the root element, or a missing or repeated root.
pub fn parse(xml: &str) -> AgentResult<ParsedDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = XmlNode::default();
    let mut stack: Vec<(String, XmlNode)> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            AgentError::Parse(format!("at position {}: {e}", reader.error_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                if stack.is_empty() && seen_root {
                    return Err(AgentError::Parse("more than one root element".into()));
                }
                stack.push(open_element(e)?);
            }
            Event::Empty(ref e) => {
                if stack.is_empty() && seen_root {
                    return Err(AgentError::Parse("more than one root element".into()));
                }
                let (name, node) = open_element(e)?;
                match stack.last_mut() {
                    Some((_, parent)) => parent.push(name, node.into_value()),
                    None => {
                        document.push(name, node.into_value());
                        seen_root = true;
                    }
                }
            }
            Event::End(_) => {
                let (name, node) = stack
                    .pop()
                    .ok_or_else(|| AgentError::Parse("unexpected closing tag".into()))?;
                match stack.last_mut() {
                    Some((_, parent)) => parent.push(name, node.into_value()),
                    None => {
                        document.push(name, node.into_value());
                        seen_root = true;
                    }
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(parse_err)?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some((_, node)) => node.push_text(&text),
                    None => {
                        return Err(AgentError::Parse("text outside of root element".into()));
                    }
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                match stack.last_mut() {
                    Some((_, node)) => node.push_text(&text),
                    None => {
                        return Err(AgentError::Parse("CDATA outside of root element".into()));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(AgentError::Parse(format!("unclosed element <{name}>")));
    }
    if !seen_root {
        return Err(AgentError::Parse("document has no root element".into()));
    }
    Ok(document)
}

/// Remove namespace prefixes from every tag, recursively.
///
/// Tags that share a local name after stripping are merged into one
/// sequence in document order; no collision is reported.
pub fn strip_namespaces(node: XmlNode) -> XmlNode {
    let mut stripped = XmlNode {
        attributes: node.attributes,
        text: node.text,
        children: Vec::new(),
    };
    for (tag, values) in node.children {
        let local = local_name(&tag).to_string();
        for value in values {
            let value = match value {
                XmlValue::Node(child) => XmlValue::Node(strip_namespaces(child)),
                text => text,
            };
            stripped.push(local.clone(), value);
        }
    }
    stripped
}

fn local_name(tag: &str) -> &str {
    tag.rsplit_once(':').map_or(tag, |(_, local)| local)
}

/// Extract leaves by dotted path into a flat map keyed by output name.
///
/// Each path is walked from the document node, taking the first occurrence
/// at every step. Paths with a missing segment are left out of the result.
pub fn project(document: &XmlNode, paths: &[(&str, &str)]) -> BTreeMap<String, XmlValue> {
    paths
        .iter()
        .filter_map(|(path, key)| {
            document
                .path(path)
                .map(|value| ((*key).to_string(), value.clone()))
        })
        .collect()
}
