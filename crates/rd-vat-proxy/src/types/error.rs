//! Error types for the proxy.

use axum::http::StatusCode;

/// All errors that can occur while serving a lookup.
#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Decode error: {0}")]
    Vat(#[from] rd_vat::VatError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProxyError {
    /// HTTP status reported to REST callers.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            ProxyError::Vat(_) | ProxyError::Http(_) | ProxyError::Upstream { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::Io(_) | ProxyError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
