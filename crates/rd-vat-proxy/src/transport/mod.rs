//! Transport to the remote SOAP service.

pub mod http;

pub use http::SoapClient;
