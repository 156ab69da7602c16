//! Lookup service: envelope → transport → decode → resolve.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rd_vat::{AliasTable, CanonicalRecord, LookupMode};
use tracing::Instrument;

use crate::render::{format_request_preview, log_records};
use crate::soap::{batch_envelope, single_envelope};
use crate::transport::SoapClient;
use crate::types::{
    BatchLookupRequest, GenericListResponse, LookupMeta, LookupRequest, ProxyError, ProxyResult,
};

/// Longest request preview written to the log.
pub const PREVIEW_MAX_LEN: usize = 2000;

/// Result of one remote call.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub request_id: String,
    pub mode: LookupMode,
    pub records: Vec<CanonicalRecord>,
    pub raw_xml: String,
    pub elapsed: Duration,
    pub fetched_at: DateTime<Utc>,
}

impl LookupOutcome {
    pub fn into_response(self) -> GenericListResponse {
        GenericListResponse {
            count: self.records.len(),
            meta: Some(LookupMeta {
                request_id: self.request_id,
                mode: self.mode,
                elapsed_ms: u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
                fetched_at: self.fetched_at,
            }),
            data: self.records,
            raw_xml: Some(self.raw_xml),
        }
    }
}

/// Taxpayer lookups against the VAT service.
#[derive(Clone)]
pub struct VatService {
    client: SoapClient,
    aliases: &'static AliasTable,
}

impl VatService {
    pub fn new(client: SoapClient) -> Self {
        Self::with_aliases(client, AliasTable::standard())
    }

    pub fn with_aliases(client: SoapClient, aliases: &'static AliasTable) -> Self {
        Self { client, aliases }
    }

    pub fn client(&self) -> &SoapClient {
        &self.client
    }

    /// Single lookup by TIN and/or name.
    pub async fn lookup(&self, req: &LookupRequest) -> ProxyResult<LookupOutcome> {
        self.execute(LookupMode::Single, single_envelope(req)).await
    }

    /// Batch lookup by TIN list.
    pub async fn lookup_batch(&self, req: &BatchLookupRequest) -> ProxyResult<LookupOutcome> {
        if req.tins.is_empty() {
            return Err(ProxyError::InvalidParams(
                "TINs must contain at least one taxpayer ID".to_string(),
            ));
        }
        self.execute(LookupMode::Batch, batch_envelope(req)).await
    }

    async fn execute(&self, mode: LookupMode, envelope: String) -> ProxyResult<LookupOutcome> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("vat_lookup", request_id = %request_id, mode = ?mode);

        async move {
            tracing::info!(
                "\n{}",
                format_request_preview(&redact_password(&envelope), PREVIEW_MAX_LEN)
            );

            let started = Instant::now();
            let raw_xml = self.client.post_envelope(&envelope).await?;
            let tree = rd_vat::xml::parse(&raw_xml)?;
            let records = rd_vat::resolve(mode, &tree, self.aliases);
            let elapsed = started.elapsed();

            log_records(&records);
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "lookup finished");

            Ok(LookupOutcome {
                request_id,
                mode,
                records,
                raw_xml,
                elapsed,
                fetched_at: Utc::now(),
            })
        }
        .instrument(span)
        .await
    }
}

/// Mask the password element of an envelope for logging.
pub fn redact_password(envelope: &str) -> String {
    const OPEN: &str = "<vat:password>";
    const CLOSE: &str = "</vat:password>";

    let Some(start) = envelope.find(OPEN).map(|i| i + OPEN.len()) else {
        return envelope.to_string();
    };
    let Some(len) = envelope[start..].find(CLOSE) else {
        return envelope.to_string();
    };
    format!("{}***{}", &envelope[..start], &envelope[start + len..])
}
