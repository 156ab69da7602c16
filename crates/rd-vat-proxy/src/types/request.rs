//! Lookup request bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ENDPOINT, SOAP_CONTENT_TYPE};

/// Credential accepted by the public service.
pub const ANONYMOUS: &str = "anonymous";

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

/// Single taxpayer lookup (`Service` operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRequest {
    #[serde(default = "anonymous")]
    pub username: String,
    #[serde(default = "anonymous")]
    pub password: String,
    /// 13-digit taxpayer ID.
    #[serde(rename = "TIN", default)]
    pub tin: Option<String>,
    /// Shop or company name to search.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    /// 0 = unknown.
    #[serde(rename = "ProvinceCode", default)]
    pub province_code: i64,
    /// 0 = unknown.
    #[serde(rename = "BranchNumber", default)]
    pub branch_number: i64,
    /// District code; 0 = unknown.
    #[serde(rename = "AmphurCode", default)]
    pub amphur_code: i64,
}

impl Default for LookupRequest {
    fn default() -> Self {
        Self {
            username: anonymous(),
            password: anonymous(),
            tin: None,
            name: None,
            province_code: 0,
            branch_number: 0,
            amphur_code: 0,
        }
    }
}

impl LookupRequest {
    pub fn for_tin(tin: impl Into<String>) -> Self {
        Self {
            tin: Some(tin.into()),
            ..Self::default()
        }
    }
}

/// Batch lookup by TIN list (`ServiceArr` operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchLookupRequest {
    #[serde(default = "anonymous")]
    pub username: String,
    #[serde(default = "anonymous")]
    pub password: String,
    #[serde(rename = "TINs", default)]
    pub tins: Vec<String>,
}

impl BatchLookupRequest {
    pub fn for_tins<I, S>(tins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: anonymous(),
            password: anonymous(),
            tins: tins.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_raw_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), SOAP_CONTENT_TYPE.to_string())])
}

/// A complete envelope forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoapRawRequest {
    pub xml: String,
    #[serde(default = "default_endpoint")]
    pub url: String,
    #[serde(default = "default_raw_headers")]
    pub headers: BTreeMap<String, String>,
}
