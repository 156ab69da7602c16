//! Async SOAP client wrapping reqwest.
//!
//! One POST per call. No retries: a failed call is reported to the caller
//! as-is.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::{ProxyConfig, SOAP_CONTENT_TYPE};
use crate::types::{ProxyError, ProxyResult, RawReply};

/// HTTP client for the VAT SOAP endpoint.
#[derive(Clone)]
pub struct SoapClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl SoapClient {
    pub fn new(config: &ProxyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("rd-vat-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST an envelope to the configured endpoint and return the response text.
    ///
    /// Non-2xx responses become [`ProxyError::Upstream`].
    pub async fn post_envelope(&self, envelope: &str) -> ProxyResult<String> {
        let resp = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(envelope.as_bytes().to_vec())
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "VAT service returned an error status");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Forward a raw envelope to any URL and report whatever comes back.
    ///
    /// Unlike `post_envelope()`, error statuses are returned, not raised.
    /// A SOAP content type is added when the caller supplied none.
    pub async fn post_raw(
        &self,
        url: &str,
        xml: &str,
        headers: &BTreeMap<String, String>,
    ) -> ProxyResult<RawReply> {
        let mut builder = self.client.post(url).timeout(self.timeout);

        let has_content_type = headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, SOAP_CONTENT_TYPE);
        }
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let r = builder.body(xml.as_bytes().to_vec()).send().await?;
        let status_code = r.status().as_u16();

        let headers: BTreeMap<String, String> = r
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let text = r.text().await?;

        Ok(RawReply {
            status_code,
            headers,
            text,
        })
    }
}
