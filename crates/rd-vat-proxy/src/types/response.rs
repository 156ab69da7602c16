//! Response bodies returned by the REST surface.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rd_vat::{CanonicalRecord, LookupMode};
use serde::Serialize;

/// Records returned by a lookup.
#[derive(Debug, Clone, Serialize)]
pub struct GenericListResponse {
    pub count: usize,
    pub data: Vec<CanonicalRecord>,
    pub raw_xml: Option<String>,
    pub meta: Option<LookupMeta>,
}

/// Bookkeeping attached to a lookup response.
#[derive(Debug, Clone, Serialize)]
pub struct LookupMeta {
    pub request_id: String,
    pub mode: LookupMode,
    pub elapsed_ms: u64,
    pub fetched_at: DateTime<Utc>,
}

/// Upstream reply to a passthrough request.
#[derive(Debug, Clone, Serialize)]
pub struct RawReply {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub text: String,
}
