//! RD VAT: response shape resolution and normalization for the Revenue Department taxpayer service.

pub mod extract;
pub mod fields;
pub mod node;
pub mod normalize;
pub mod pipeline;
pub mod pivot;
pub mod record;
pub mod shape;
pub mod types;
pub mod xml;

pub use extract::{extract, FieldValue};
pub use fields::{AliasTable, CanonicalField, FIELD_COUNT};
pub use node::{Node, NodeMap};
pub use normalize::KeyNormalizer;
pub use pipeline::{resolve, resolve_batch, resolve_single, LookupMode};
pub use pivot::pivot;
pub use record::CanonicalRecord;
pub use shape::resolve as resolve_shape;
pub use types::*;
