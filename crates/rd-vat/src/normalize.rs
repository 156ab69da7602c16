//! Map raw records onto the canonical field set.

use crate::extract::extract;
use crate::fields::{AliasTable, CanonicalField};
use crate::node::Node;
use crate::record::CanonicalRecord;
use crate::types::{RawRecord, PLACEHOLDER};

/// Resolves aliases against a read-only [`AliasTable`].
#[derive(Debug, Clone, Copy)]
pub struct KeyNormalizer<'t> {
    aliases: &'t AliasTable,
}

impl Default for KeyNormalizer<'static> {
    fn default() -> Self {
        Self::new(AliasTable::standard())
    }
}

impl<'t> KeyNormalizer<'t> {
    pub fn new(aliases: &'t AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &'t AliasTable {
        self.aliases
    }

    /// Build the canonical record for one raw record. Never fails.
    ///
    /// Each field takes the first alias holding a usable value; unknown keys
    /// are dropped.
    pub fn normalize(&self, record: &RawRecord) -> CanonicalRecord {
        let mut out = CanonicalRecord::empty();
        for field in CanonicalField::ALL {
            if let Some(value) = self.first_present(record, field) {
                out.set(field, value);
            }
        }
        out
    }

    pub fn normalize_all<'r, I>(&self, records: I) -> Vec<CanonicalRecord>
    where
        I: IntoIterator<Item = &'r RawRecord>,
    {
        records.into_iter().map(|r| self.normalize(r)).collect()
    }

    fn first_present(&self, record: &RawRecord, field: CanonicalField) -> Option<String> {
        self.aliases
            .aliases(field)
            .iter()
            .filter_map(|alias| record.get(alias))
            .filter(|node| !is_missing(node))
            .map(extract)
            .find(|text| !text.is_empty() && text != PLACEHOLDER)
    }
}

fn is_missing(node: &Node) -> bool {
    node.is_blank() || node.as_text() == Some(PLACEHOLDER)
}
