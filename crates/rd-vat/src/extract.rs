//! Scalar extraction from possibly boxed field values.
//!
//! The service's schema wraps loosely-typed values in an `anyType` element,
//! sometimes once, sometimes around a list. [`FieldValue`] classifies a node
//! once so callers match on shape instead of probing maps repeatedly.

use crate::node::{Node, NodeMap};
use crate::types::PLACEHOLDER;
use crate::xml::{ATTRIBUTE_PREFIX, TEXT_KEY};

/// Element name of the boxed-value wrapper.
pub const BOXED_VALUE_KEY: &str = "anyType";

/// Secondary key some serializers use for element content.
pub const VALUE_KEY: &str = "value";

/// A field value with its boxing made explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Null, an empty mapping, or a mapping carrying no text.
    Absent,
    Scalar(&'a str),
    Wrapped(Box<FieldValue<'a>>),
    Sequence(Vec<FieldValue<'a>>),
}

/// Find the boxed-value wrapper in a mapping, with or without a namespace prefix.
///
/// Attribute keys never count as a wrapper.
pub fn boxed_value(map: &NodeMap) -> Option<&Node> {
    map.get(BOXED_VALUE_KEY).or_else(|| {
        map.iter()
            .filter(|(k, _)| !k.starts_with(ATTRIBUTE_PREFIX))
            .find(|(k, _)| k.rsplit_once(':').is_some_and(|(_, local)| local == BOXED_VALUE_KEY))
            .map(|(_, v)| v)
    })
}

impl<'a> FieldValue<'a> {
    /// Classify a node.
    pub fn classify(node: &'a Node) -> Self {
        match node {
            Node::Null => FieldValue::Absent,
            Node::Text(s) => FieldValue::Scalar(s),
            Node::Seq(items) => FieldValue::Sequence(items.iter().map(FieldValue::classify).collect()),
            Node::Map(map) => {
                if let Some(inner) = boxed_value(map) {
                    return FieldValue::Wrapped(Box::new(FieldValue::classify(inner)));
                }
                [TEXT_KEY, VALUE_KEY]
                    .iter()
                    .filter_map(|k| map.get(k))
                    .filter_map(Node::as_text)
                    .find(|s| !s.is_empty())
                    .map(FieldValue::Scalar)
                    .unwrap_or(FieldValue::Absent)
            }
        }
    }

    /// Strip every boxing layer.
    pub fn unwrap_boxes(self) -> Self {
        match self {
            FieldValue::Wrapped(inner) => inner.unwrap_boxes(),
            other => other,
        }
    }

    /// Display text for this value, or the placeholder.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Absent => PLACEHOLDER.to_string(),
            FieldValue::Scalar(s) => (*s).to_string(),
            FieldValue::Wrapped(inner) => inner.to_text(),
            FieldValue::Sequence(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(FieldValue::to_text)
                    .filter(|s| !s.is_empty() && s != PLACEHOLDER)
                    .collect();
                if parts.is_empty() {
                    PLACEHOLDER.to_string()
                } else {
                    parts.join(", ")
                }
            }
        }
    }
}

/// Canonical text of a single field value. Never fails.
pub fn extract(node: &Node) -> String {
    FieldValue::classify(node).to_text()
}
