//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit value, then environment variable,
//! then built-in default.

use std::time::Duration;

/// Production endpoint of the VAT service.
pub const DEFAULT_ENDPOINT: &str = "https://rdws.rd.go.th/serviceRD3/vatserviceRD3.asmx";

/// Content type expected by the SOAP 1.2 endpoint.
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

pub const ENV_ENDPOINT: &str = "RD_VAT_ENDPOINT";
pub const ENV_TIMEOUT: &str = "RD_VAT_TIMEOUT_SECS";
pub const ENV_LISTEN: &str = "RD_VAT_LISTEN";
pub const ENV_USERNAME: &str = "RD_VAT_USERNAME";
pub const ENV_PASSWORD: &str = "RD_VAT_PASSWORD";

/// Resolved proxy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProxyConfig {
    pub fn resolve(endpoint: Option<&str>, timeout_secs: Option<u64>) -> Self {
        Self {
            endpoint: resolve_endpoint(endpoint),
            timeout: resolve_timeout(timeout_secs),
        }
    }
}

/// Resolve the SOAP endpoint URL.
pub fn resolve_endpoint(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    match std::env::var(ENV_ENDPOINT) {
        Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => DEFAULT_ENDPOINT.to_string(),
    }
}

/// Resolve the upstream request timeout.
pub fn resolve_timeout(explicit: Option<u64>) -> Duration {
    if let Some(secs) = explicit {
        return Duration::from_secs(secs);
    }

    let secs = match std::env::var(ENV_TIMEOUT) {
        Ok(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!("{ENV_TIMEOUT}={raw:?} is not a number of seconds, using {DEFAULT_TIMEOUT_SECS}");
            DEFAULT_TIMEOUT_SECS
        }),
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    Duration::from_secs(secs)
}

/// Resolve the REST listen address.
pub fn resolve_listen(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    std::env::var(ENV_LISTEN).unwrap_or_else(|_| DEFAULT_LISTEN.to_string())
}

/// Resolve a credential, falling back to the anonymous account.
pub fn resolve_credential(explicit: Option<&str>, env_key: &str) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }

    std::env::var(env_key).unwrap_or_else(|_| crate::types::ANONYMOUS.to_string())
}
