//! Single and batch resolution paths.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::AliasTable;
use crate::node::Node;
use crate::normalize::KeyNormalizer;
use crate::pivot::pivot;
use crate::record::CanonicalRecord;
use crate::shape;

/// Which remote operation produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    Single,
    Batch,
}

/// Records from a single-lookup response.
pub fn resolve_single(tree: &Node, aliases: &AliasTable) -> Vec<CanonicalRecord> {
    let rows = shape::resolve(tree);
    KeyNormalizer::new(aliases).normalize_all(&rows)
}

/// Records from a batch response.
///
/// Tries the columnar pivot first and falls back to the single-lookup path
/// when it finds nothing.
pub fn resolve_batch(tree: &Node, aliases: &AliasTable) -> Vec<CanonicalRecord> {
    match pivot(tree) {
        Some(rows) if !rows.is_empty() => KeyNormalizer::new(aliases).normalize_all(&rows),
        _ => {
            debug!("no columnar batch result, falling back to row resolution");
            resolve_single(tree, aliases)
        }
    }
}

/// Dispatch on [`LookupMode`].
pub fn resolve(mode: LookupMode, tree: &Node, aliases: &AliasTable) -> Vec<CanonicalRecord> {
    match mode {
        LookupMode::Single => resolve_single(tree, aliases),
        LookupMode::Batch => resolve_batch(tree, aliases),
    }
}
