//! HTTP REST API for the proxy.
//!
//! Each lookup endpoint takes a JSON body, calls the VAT service, and
//! returns uniform records. Upstream failures are reported as 502 with a
//! `detail` message.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::SOAP_CONTENT_TYPE;
use crate::service::VatService;
use crate::types::{
    BatchLookupRequest, GenericListResponse, LookupRequest, ProxyError, RawReply, SoapRawRequest,
};

/// State shared by all handlers.
pub struct AppState {
    pub service: VatService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: VatService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/meta", get(meta))
        .route("/vat/service", post(vat_service))
        .route("/vat/service-batch", post(vat_service_batch))
        .route("/soap/raw", post(soap_raw))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the REST API on `addr` until the process is stopped.
pub async fn start(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────

/// Error body in `{"detail": ...}` form.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn from_proxy(context: &str, err: ProxyError) -> Self {
        let status = err.status();
        let detail = match err {
            ProxyError::InvalidParams(msg) => msg,
            other => format!("{context}: {other}"),
        };
        tracing::error!(status = status.as_u16(), "{detail}");
        Self { status, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn meta(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "rd_endpoint": state.service.client().endpoint(),
        "default_headers": { "Content-Type": SOAP_CONTENT_TYPE },
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
    }))
}

async fn vat_service(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LookupRequest>,
) -> Result<Json<GenericListResponse>, ApiError> {
    state
        .service
        .lookup(&body)
        .await
        .map(|outcome| Json(outcome.into_response()))
        .map_err(|e| ApiError::from_proxy("VAT Service error", e))
}

async fn vat_service_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchLookupRequest>,
) -> Result<Json<GenericListResponse>, ApiError> {
    state
        .service
        .lookup_batch(&body)
        .await
        .map(|outcome| Json(outcome.into_response()))
        .map_err(|e| ApiError::from_proxy("VAT Service batch error", e))
}

async fn soap_raw(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SoapRawRequest>,
) -> Result<Json<RawReply>, ApiError> {
    state
        .service
        .client()
        .post_raw(&body.url, &body.xml, &body.headers)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_proxy("SOAP passthrough error", e))
}
