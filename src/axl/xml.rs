//! Minimal XML element tree for SOAP envelopes
//!
//! Requests are assembled as [`XmlNode`] trees and serialized with
//! `quick_xml::Writer`; responses are read back into the same shape with
//! `quick_xml::Reader`. Lookups match on local names so callers never deal
//! with namespace prefixes.

use crate::utils::AxlError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// An element with attributes, optional text and child elements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

/// Strip any namespace prefix from an element or attribute name
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A leaf element holding text
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn leaf_child(self, name: &str, text: impl Into<String>) -> Self {
        self.child(XmlNode::leaf(name, text))
    }

    /// Add a text child only when a value is present
    pub fn optional_child(self, name: &str, text: Option<&str>) -> Self {
        match text {
            Some(text) => self.leaf_child(name, text),
            None => self,
        }
    }

    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// First direct child with the given local name
    pub fn get(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.local_name() == name)
    }

    /// All direct children with the given local name
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.local_name() == name)
    }

    /// Follow a chain of child names, e.g. `["line", "associatedDevices"]`
    pub fn path(&self, names: &[&str]) -> Option<&XmlNode> {
        names.iter().try_fold(self, |node, name| node.get(name))
    }

    /// Depth-first search for the first element with the given local name
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        if self.local_name() == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_name(key) == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed text of this element, `None` when empty
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Text of a direct child
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(XmlNode::text)
    }

    fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), AxlError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(AxlError::xml)?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(AxlError::xml)?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(AxlError::xml)?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(AxlError::xml)?;
        Ok(())
    }

    /// Serialize as a standalone document with an XML declaration
    pub fn to_document(&self) -> Result<String, AxlError> {
        self.serialize(false)
    }

    /// Indented rendering for debug output
    pub fn to_pretty(&self) -> Result<String, AxlError> {
        self.serialize(true)
    }

    fn serialize(&self, pretty: bool) -> Result<String, AxlError> {
        let mut writer = if pretty {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(AxlError::xml)?;
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner().into_inner()).map_err(AxlError::xml)
    }
}

fn start_node(e: &BytesStart<'_>) -> Result<XmlNode, AxlError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr.map_err(AxlError::xml)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(AxlError::xml)?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn append_text(node: &mut XmlNode, text: &str) {
    match &mut node.text {
        Some(existing) => existing.push_str(text),
        None => node.text = Some(text.to_string()),
    }
}

/// Parse a document into its root element
pub fn parse_document(xml: &str) -> Result<XmlNode, AxlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(start_node(e)?),
            Ok(Event::Empty(ref e)) => {
                let node = start_node(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(node) = stack.last_mut() {
                    let text = e.unescape().map_err(AxlError::xml)?;
                    append_text(node, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(node) = stack.last_mut() {
                    let raw = e.into_inner();
                    append_text(node, &String::from_utf8_lossy(&raw));
                }
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or_else(|| AxlError::Xml {
                    message: "unbalanced closing tag".to_string(),
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(AxlError::xml(e)),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(AxlError::Xml {
            message: "document ended inside an element".to_string(),
        });
    }
    root.ok_or_else(|| AxlError::Xml {
        message: "document has no root element".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_escapes_text() {
        let node = XmlNode::new("ns:updateLine")
            .leaf_child("description", "Smith & Sons <HQ>")
            .child(XmlNode::new("callForwardAll"));
        let xml = node.to_document().unwrap();
        assert!(xml.contains("<description>Smith &amp; Sons &lt;HQ&gt;</description>"));
        assert!(xml.contains("<callForwardAll/>"));
    }

    #[test]
    fn test_parse_reads_attributes_and_nested_text() {
        let xml = r#"<?xml version="1.0"?>
            <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
              <soapenv:Body>
                <ns:listPhoneResponse xmlns:ns="http://www.cisco.com/AXL/API/11.5">
                  <return>
                    <phone uuid="{1}">
                      <name>SEP001122334455</name>
                      <currentProfileName uuid="{AB}">jdoe-udp</currentProfileName>
                    </phone>
                    <phone uuid="{2}">
                      <name>SEP001122334466</name>
                      <currentProfileName/>
                    </phone>
                  </return>
                </ns:listPhoneResponse>
              </soapenv:Body>
            </soapenv:Envelope>"#;

        let root = parse_document(xml).unwrap();
        assert_eq!(root.local_name(), "Envelope");
        let ret = root.find("return").unwrap();
        let phones: Vec<_> = ret.get_all("phone").collect();
        assert_eq!(phones.len(), 2);
        assert_eq!(phones[0].child_text("name"), Some("SEP001122334455"));
        let profile = phones[0].get("currentProfileName").unwrap();
        assert_eq!(profile.attribute("uuid"), Some("{AB}"));
        assert_eq!(profile.text(), Some("jdoe-udp"));
        assert_eq!(phones[1].get("currentProfileName").unwrap().text(), None);
    }

    #[test]
    fn test_path_follows_children() {
        let node = XmlNode::new("return").child(
            XmlNode::new("line").child(
                XmlNode::new("associatedDevices").leaf_child("device", "SEP001122334455"),
            ),
        );
        let devices = node.path(&["line", "associatedDevices"]).unwrap();
        assert_eq!(devices.child_text("device"), Some("SEP001122334455"));
        assert!(node.path(&["line", "missing"]).is_none());
    }

    #[test]
    fn test_parse_rejects_truncated_document() {
        assert!(parse_document("<a><b>text</b>").is_err());
    }
}
