//! Locate the record list inside a decoded SOAP response.
//!
//! The service wraps its rows differently depending on deployment and on
//! whether zero, one, or many rows matched. Each known wrapper shape is a
//! [`ShapeMatcher`]; matchers run in priority order and the first hit wins.

use tracing::debug;

use crate::node::{Node, NodeMap};
use crate::types::RawRecord;

/// Envelope element names, namespaced first.
pub const ENVELOPE_KEYS: &[&str] = &["soap:Envelope", "Envelope"];

/// Body element names, namespaced first.
pub const BODY_KEYS: &[&str] = &["soap:Body", "Body"];

/// Known response wrappers in priority order.
pub const RESPONSE_NODE_KEYS: &[&str] = &[
    "ServiceResponse",
    "vat:ServiceResponse",
    "ServiceArrResponse",
    "vat:ServiceArrResponse",
    "ServiceResult",
    "vat:ServiceResult",
    "ServiceArrResult",
    "vat:ServiceArrResult",
];

/// DataSet diff-gram wrapper names.
pub const DIFFGRAM_KEYS: &[&str] = &["diffgr:diffgram", "diffgram"];

/// A pure function from the SOAP body to the rows it recognizes.
pub type ShapeMatcher = fn(&NodeMap) -> Option<Vec<RawRecord>>;

/// Matchers in the order they are tried.
pub const SHAPE_MATCHERS: &[(&str, ShapeMatcher)] = &[
    ("response-node", match_response_nodes),
    ("diffgram", match_diffgram),
];

/// The SOAP body of a decoded document.
///
/// The document root stands in for the body only when neither an envelope
/// nor a body element is present. An envelope without a body element, or a
/// body that is null (`<soap:Body/>`) or not a mapping, yields `None`.
pub fn soap_body(tree: &Node) -> Option<&NodeMap> {
    let root = tree.as_map()?;
    match root.get_any(ENVELOPE_KEYS) {
        Some(envelope) => envelope.as_map()?.get_any(BODY_KEYS)?.as_map(),
        None => match root.get_any(BODY_KEYS) {
            Some(body) => body.as_map(),
            None => Some(root),
        },
    }
}

/// Rows found in the response; empty when no known shape carries data.
pub fn resolve(tree: &Node) -> Vec<RawRecord> {
    let Some(body) = soap_body(tree) else {
        debug!("response tree is not a mapping");
        return Vec::new();
    };

    for (name, matcher) in SHAPE_MATCHERS {
        if let Some(records) = matcher(body) {
            debug!(shape = *name, rows = records.len(), "response shape resolved");
            return records;
        }
    }

    debug!("no data-bearing node in response body");
    Vec::new()
}

/// Named response wrappers, or every mapping child when none is present.
fn match_response_nodes(body: &NodeMap) -> Option<Vec<RawRecord>> {
    let mut candidates: Vec<&NodeMap> = RESPONSE_NODE_KEYS
        .iter()
        .filter_map(|k| body.get(k))
        .filter_map(Node::as_map)
        .collect();
    if candidates.is_empty() {
        candidates = body.values().filter_map(Node::as_map).collect();
    }
    candidates.into_iter().find_map(records_in)
}

/// One level below a diff-gram wrapper.
fn match_diffgram(body: &NodeMap) -> Option<Vec<RawRecord>> {
    let diffgram = body.get_any(DIFFGRAM_KEYS)?.as_map()?;
    diffgram
        .values()
        .filter_map(Node::as_map)
        .find_map(records_in)
}

/// The first sequence child is the row list; otherwise a lone mapping
/// child is a single row.
fn records_in(node: &NodeMap) -> Option<Vec<RawRecord>> {
    if let Some(items) = node.values().find_map(Node::as_seq) {
        // non-mapping items (empty elements, bare text) carry no fields
        return Some(items.iter().filter_map(Node::as_map).cloned().collect());
    }
    node.values()
        .find_map(Node::as_map)
        .map(|row| vec![row.clone()])
}
