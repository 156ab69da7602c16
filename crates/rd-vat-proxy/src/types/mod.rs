//! Request, response, and error types for the proxy.

pub mod error;
pub mod request;
pub mod response;

pub use error::*;
pub use request::*;
pub use response::*;
