//! Shared types for the resolution engine.

use crate::node::NodeMap;

/// Output marker for an absent or empty value.
pub const PLACEHOLDER: &str = "-";

/// A remote-service record keyed by whatever field names the service used.
pub type RawRecord = NodeMap;

/// Errors surfaced while turning response text into a tree.
///
/// The resolution engine itself never fails; only decoding does.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VatError {
    #[error("XML error: {0}")]
    Xml(String),
}

/// Convenience result type.
pub type VatResult<T> = Result<T, VatError>;
