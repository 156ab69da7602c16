//! SOAP request construction.

pub mod envelope;

pub use envelope::{batch_envelope, single_envelope, SOAP_NS, VAT_NS};
