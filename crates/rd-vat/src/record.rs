//! Canonical output record.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::fields::{CanonicalField, FIELD_COUNT};
use crate::node::{Node, NodeMap};
use crate::types::{RawRecord, PLACEHOLDER};

/// A closed record over exactly the 17 canonical fields.
///
/// Values are display-ready strings; absent values hold the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalRecord {
    values: [String; FIELD_COUNT],
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| PLACEHOLDER.to_string()),
        }
    }
}

impl CanonicalRecord {
    /// A record with every field set to the placeholder.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Fields and values in output order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        CanonicalField::ALL
            .into_iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Whether every field holds the placeholder.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| v == PLACEHOLDER)
    }

    /// Back to a raw record keyed by canonical names.
    pub fn to_raw(&self) -> RawRecord {
        self.iter()
            .map(|(field, value)| (field.key(), Node::text(value)))
            .collect::<NodeMap>()
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}
