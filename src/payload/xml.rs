use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::PayloadError;

use super::ATTRIBUTE_TAG;
use super::document::{Content, Document, NodeId};

const PAIR_NAME: &str = "name";
const PAIR_VALUE: &str = "value";

impl Document {
    /// Parses an XML payload template.
    ///
    /// `<attribute name=".." value=".." />` elements become attribute pairs
    /// of their parent; every other element becomes a node whose XML
    /// attributes are its properties.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed XML, a template without a root
    /// element, or more than one top-level element.
    pub fn from_template(xml: &str) -> Result<Self, PayloadError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut document: Option<Document> = None;
        // `None` entries stand for open `<attribute>` elements.
        let mut open: Vec<Option<NodeId>> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|err| PayloadError::ParseTemplate { source: err })?;
            match event {
                Event::Start(start) => {
                    let node = open_element(&mut document, &open, &start)?;
                    open.push(node);
                }
                Event::Empty(start) => {
                    open_element(&mut document, &open, &start)?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Eof => break,
                Event::Text(_)
                | Event::CData(_)
                | Event::Comment(_)
                | Event::Decl(_)
                | Event::PI(_)
                | Event::DocType(_) => {}
            }
        }

        document.ok_or_else(|| PayloadError::InvalidTemplate {
            reason: "template has no root element".to_owned(),
        })
    }

    /// Compact XML rendering of the attached tree.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut output = String::with_capacity(256);
        self.render(self.root(), &mut output);
        output
    }

    fn render(&self, id: NodeId, output: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        if !self.is_attached(id) {
            return;
        }
        output.push('<');
        output.push_str(&node.tag);
        for (name, value) in &node.props {
            push_xml_attr(output, name, value);
        }
        if node.content.is_empty() {
            output.push_str(" />");
            return;
        }
        output.push('>');
        for item in &node.content {
            match item {
                Content::Pair { name, value } => {
                    output.push('<');
                    output.push_str(ATTRIBUTE_TAG);
                    push_xml_attr(output, PAIR_NAME, name);
                    push_xml_attr(output, PAIR_VALUE, value);
                    output.push_str(" />");
                }
                Content::Child(child) => self.render(*child, output),
            }
        }
        output.push_str("</");
        output.push_str(&node.tag);
        output.push('>');
    }
}

fn push_xml_attr(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&escape(value));
    output.push('"');
}

fn open_element(
    document: &mut Option<Document>,
    open: &[Option<NodeId>],
    start: &BytesStart<'_>,
) -> Result<Option<NodeId>, PayloadError> {
    let tag = element_name(start);
    let props = element_attributes(start)?;

    if tag == ATTRIBUTE_TAG {
        let (Some(doc), Some(Some(parent))) = (document.as_mut(), open.last()) else {
            return Err(PayloadError::InvalidTemplate {
                reason: "attribute element outside of a node".to_owned(),
            });
        };
        let name = lookup(&props, PAIR_NAME).ok_or_else(|| PayloadError::InvalidTemplate {
            reason: "attribute element without a name".to_owned(),
        })?;
        let value = lookup(&props, PAIR_VALUE).unwrap_or_default();
        doc.set_attr(*parent, name, value)?;
        return Ok(None);
    }

    let borrowed: Vec<(&str, &str)> = props
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let Some(doc) = document.as_mut() else {
        let root = Document::with_root(&tag, &borrowed);
        let root_id = root.root();
        *document = Some(root);
        return Ok(Some(root_id));
    };

    match open.last() {
        Some(Some(parent)) => doc.add_child(*parent, &tag, &borrowed).map(Some),
        Some(None) => Err(PayloadError::InvalidTemplate {
            reason: format!("element '{}' nested inside an attribute element", tag),
        }),
        None => Err(PayloadError::InvalidTemplate {
            reason: format!("second top-level element '{}'", tag),
        }),
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn element_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>, PayloadError> {
    let mut props = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| PayloadError::ParseTemplate {
            source: quick_xml::Error::from(err),
        })?;
        let key: Cow<'_, str> = String::from_utf8_lossy(attribute.key.as_ref());
        let value = attribute
            .unescape_value()
            .map_err(|err| PayloadError::ParseTemplate { source: err })?;
        props.push((key.into_owned(), value.into_owned()));
    }
    Ok(props)
}

fn lookup<'props>(props: &'props [(String, String)], name: &str) -> Option<&'props str> {
    props
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
