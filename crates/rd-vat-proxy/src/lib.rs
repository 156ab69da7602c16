//! RD VAT Proxy: SOAP to REST proxy for the Revenue Department VAT taxpayer service.

pub mod config;
pub mod logging;
pub mod render;
pub mod rest;
pub mod service;
pub mod soap;
pub mod transport;
pub mod types;

pub use config::ProxyConfig;
pub use service::{LookupOutcome, VatService};
pub use transport::SoapClient;
pub use types::{ProxyError, ProxyResult};
