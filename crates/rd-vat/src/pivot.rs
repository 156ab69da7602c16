//! Rebuild rows from the column-oriented batch response.
//!
//! `ServiceArr` replies carry one element per field, each holding the values
//! for every requested TIN in request order. Rows are rebuilt strictly by
//! position; a column shorter than the longest one is padded with the
//! placeholder. Whether a short column is a real gap or a truncation cannot
//! be told from the data, so padding is kept as-is.

use tracing::debug;

use crate::extract::{boxed_value, extract};
use crate::node::{Node, NodeMap};
use crate::shape::soap_body;
use crate::types::{RawRecord, PLACEHOLDER};
use crate::xml::ATTRIBUTE_PREFIX;

/// Batch response element names, unprefixed first.
pub const BATCH_RESPONSE_KEYS: &[&str] = &["ServiceArrResponse", "vat:ServiceArrResponse"];

/// Batch result element names, unprefixed first.
pub const BATCH_RESULT_KEYS: &[&str] = &["ServiceArrResult", "vat:ServiceArrResult"];

/// Pivot a batch response into rows.
///
/// Returns `None` when the batch container is missing or holds no values;
/// callers then fall back to [`crate::shape::resolve`].
pub fn pivot(tree: &Node) -> Option<Vec<RawRecord>> {
    let result = batch_result(tree)?;

    let columns: Vec<(&str, Vec<&Node>)> = result
        .iter()
        .filter(|(name, value)| !value.is_null() && !name.starts_with(ATTRIBUTE_PREFIX))
        .map(|(name, value)| (name, column_values(value)))
        .collect();

    let max_len = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
    if max_len == 0 {
        debug!("batch result carries no column values");
        return None;
    }

    debug!(columns = columns.len(), rows = max_len, "pivoting batch result");
    let rows = (0..max_len)
        .map(|i| {
            columns
                .iter()
                .map(|(name, values)| {
                    let cell = values.get(i).map_or_else(|| PLACEHOLDER.to_string(), |v| extract(v));
                    (*name, Node::text(cell))
                })
                .collect::<NodeMap>()
        })
        .collect();
    Some(rows)
}

fn batch_result(tree: &Node) -> Option<&NodeMap> {
    soap_body(tree)?
        .get_any(BATCH_RESPONSE_KEYS)?
        .as_map()?
        .get_any(BATCH_RESULT_KEYS)?
        .as_map()
}

/// The value list of one column.
fn column_values(column: &Node) -> Vec<&Node> {
    match column {
        Node::Map(map) => match boxed_value(map) {
            Some(Node::Seq(items)) => items.iter().collect(),
            Some(inner) => vec![inner],
            None => vec![column],
        },
        Node::Seq(items) => items.iter().collect(),
        other => vec![other],
    }
}
