//! Decode XML text into a generic [`Node`] tree.
//!
//! Follows the usual "XML as dictionaries" conventions: qualified element
//! names are kept verbatim (`soap:Envelope`), attributes become `@name`
//! keys, text next to attributes or children becomes `#text`, repeated
//! siblings collapse into a sequence, and empty elements decode to null.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::node::{Node, NodeMap};
use crate::types::{VatError, VatResult};

/// Key used for element text when the element also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Prefix applied to attribute names.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Deepest element nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 256;

struct Frame {
    name: String,
    children: NodeMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> VatResult<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut children = NodeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| VatError::Xml(format!("bad attribute on <{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| VatError::Xml(format!("bad attribute value on <{name}>: {e}")))?;
            children.push_repeated(format!("{ATTRIBUTE_PREFIX}{key}"), Node::text(value.into_owned()));
        }
        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Node) {
        let text = self.text.trim();
        let node = if self.children.is_empty() {
            if text.is_empty() {
                Node::Null
            } else {
                Node::text(text)
            }
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert(TEXT_KEY, Node::text(text));
            }
            Node::Map(children)
        };
        (self.name, node)
    }
}

/// Parse a complete XML document.
///
/// The result is a one-entry mapping from the root element name to its
/// decoded content. Documents nested deeper than [`MAX_DEPTH`] are rejected.
pub fn parse(xml: &str) -> VatResult<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(VatError::Xml(format!(
                        "document nested deeper than {MAX_DEPTH} elements"
                    )));
                }
                stack.push(Frame::open(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let frame = Frame::open(&e)?;
                attach(&mut stack, &mut root, frame)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(top) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| VatError::Xml(format!("bad text in <{}>: {err}", top.name)))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| VatError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, frame)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(VatError::Xml(format!(
                    "parse error at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(VatError::Xml(format!("unterminated element <{}>", open.name)));
    }

    let (name, node) = root.ok_or_else(|| VatError::Xml("document has no root element".to_string()))?;
    let mut doc = NodeMap::new();
    doc.insert(name, node);
    Ok(Node::Map(doc))
}

fn attach(stack: &mut [Frame], root: &mut Option<(String, Node)>, frame: Frame) -> VatResult<()> {
    let (name, node) = frame.close();
    match stack.last_mut() {
        Some(parent) => parent.children.push_repeated(name, node),
        None if root.is_none() => *root = Some((name, node)),
        None => return Err(VatError::Xml(format!("second root element <{name}>"))),
    }
    Ok(())
}
