//! Integration tests for rd-vat-proxy.
//!
//! The VAT endpoint is replaced by a wiremock server; the REST surface is
//! driven in-process through the axum router.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rd_vat::{CanonicalField, LookupMode};
use rd_vat_proxy::config::SOAP_CONTENT_TYPE;
use rd_vat_proxy::rest::{router, AppState};
use rd_vat_proxy::types::{BatchLookupRequest, LookupRequest};
use rd_vat_proxy::{ProxyConfig, ProxyError, SoapClient, VatService};

// ─────────────────────── fixtures ───────────────────────

const SERVICE_PATH: &str = "/serviceRD3/vatserviceRD3.asmx";

const SINGLE_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope"
               xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soap:Body>
    <ServiceResponse xmlns="https://rdws.rd.go.th/serviceRD3/vatserviceRD3">
      <ServiceResult>
        <vNID><anyType xsi:type="xsd:string">0105536000000</anyType></vNID>
        <vBranchName><anyType xsi:type="xsd:string">ทดสอบ จำกัด</anyType></vBranchName>
        <vProvince><anyType xsi:type="xsd:string">กรุงเทพมหานคร</anyType></vProvince>
        <vPostCode><anyType xsi:type="xsd:string">10500</anyType></vPostCode>
      </ServiceResult>
    </ServiceResponse>
  </soap:Body>
</soap:Envelope>"#;

const BATCH_RESPONSE: &str = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <ServiceArrResponse xmlns="https://rdws.rd.go.th/serviceRD3/vatserviceRD3">
      <ServiceArrResult>
        <vNID>
          <anyType>1111111111111</anyType>
          <anyType>2222222222222</anyType>
        </vNID>
        <vPostCode>
          <anyType>10110</anyType>
        </vPostCode>
      </ServiceArrResult>
    </ServiceArrResponse>
  </soap:Body>
</soap:Envelope>"#;

const EMPTY_RESPONSE: &str = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body><ServiceResponse><ServiceResult/></ServiceResponse></soap:Body>
</soap:Envelope>"#;

// ─────────────────────── helpers ───────────────────────

async fn mount_soap(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/soap+xml"))
        .mount(server)
        .await;
}

fn service_for(server: &MockServer) -> VatService {
    let config = ProxyConfig::resolve(Some(&format!("{}{SERVICE_PATH}", server.uri())), Some(5));
    VatService::new(SoapClient::new(&config))
}

fn app_for(server: &MockServer) -> axum::Router {
    router(Arc::new(AppState::new(service_for(server))))
}

async fn call(app: axum::Router, verb: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(verb).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ─────────────────────── service ───────────────────────

#[tokio::test]
async fn test_single_lookup_sends_soap_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("content-type", SOAP_CONTENT_TYPE))
        .and(body_string_contains("<vat:TIN>0105536000000</vat:TIN>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SINGLE_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service_for(&server)
        .lookup(&LookupRequest::for_tin("0105536000000"))
        .await
        .unwrap();

    assert_eq!(outcome.mode, LookupMode::Single);
    assert_eq!(outcome.records.len(), 1);
    let rec = &outcome.records[0];
    assert_eq!(rec.get(CanonicalField::Nid), "0105536000000");
    assert_eq!(rec.get(CanonicalField::BranchName), "ทดสอบ จำกัด");
    assert_eq!(rec.get(CanonicalField::ProvinceName), "กรุงเทพมหานคร");
    assert_eq!(rec.get(CanonicalField::StreetName), "-");
    assert_eq!(outcome.raw_xml, SINGLE_RESPONSE);
}

#[tokio::test]
async fn test_batch_lookup_pivots_columns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(body_string_contains("<vat:ServiceArr>"))
        .and(body_string_contains("<vat:string>2222222222222</vat:string>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BATCH_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service_for(&server)
        .lookup_batch(&BatchLookupRequest::for_tins(["1111111111111", "2222222222222"]))
        .await
        .unwrap();

    assert_eq!(outcome.mode, LookupMode::Batch);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].get(CanonicalField::PostCode), "10110");
    assert_eq!(outcome.records[1].get(CanonicalField::Nid), "2222222222222");
    assert_eq!(outcome.records[1].get(CanonicalField::PostCode), "-");
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let server = MockServer::start().await;
    mount_soap(&server, 200, EMPTY_RESPONSE).await;

    let outcome = service_for(&server)
        .lookup(&LookupRequest::for_tin("9999999999999"))
        .await
        .unwrap();
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.into_response().count, 0);
}

#[tokio::test]
async fn test_upstream_error_status_is_reported() {
    let server = MockServer::start().await;
    mount_soap(&server, 500, "<fault/>").await;

    let err = service_for(&server)
        .lookup(&LookupRequest::for_tin("0105536000000"))
        .await
        .unwrap_err();
    match err {
        ProxyError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "<fault/>");
        }
        other => panic!("expected upstream error, got {other}"),
    }
}

#[tokio::test]
async fn test_malformed_reply_is_decode_error() {
    let server = MockServer::start().await;
    mount_soap(&server, 200, "<soap:Envelope><soap:Body>").await;

    let err = service_for(&server)
        .lookup(&LookupRequest::for_tin("0105536000000"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Vat(_)), "got {err}");
}

#[tokio::test]
async fn test_empty_soap_body_yields_no_records() {
    let server = MockServer::start().await;
    mount_soap(
        &server,
        200,
        "<soap:Envelope><soap:Header><Session><Id>42</Id></Session></soap:Header><soap:Body/></soap:Envelope>",
    )
    .await;

    let outcome = service_for(&server)
        .lookup(&LookupRequest::for_tin("0105536000000"))
        .await
        .unwrap();
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn test_deeply_nested_reply_is_rejected() {
    let server = MockServer::start().await;
    let deep = format!("{}{}", "<a>".repeat(20_000), "</a>".repeat(20_000));
    mount_soap(&server, 200, &deep).await;

    let err = service_for(&server)
        .lookup(&LookupRequest::for_tin("0105536000000"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Vat(_)), "got {err}");
}

#[tokio::test]
async fn test_post_envelope_targets_configured_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("content-type", SOAP_CONTENT_TYPE))
        .and(body_string_contains("<ping/>"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<pong/>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProxyConfig::resolve(Some(&format!("{}{SERVICE_PATH}", server.uri())), Some(5));
    let text = SoapClient::new(&config).post_envelope("<ping/>").await.unwrap();
    assert_eq!(text, "<pong/>");
}

// ─────────────────────── REST ───────────────────────

#[tokio::test]
async fn test_health_and_meta() {
    let server = MockServer::start().await;

    let (status, body) = call(app_for(&server), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = call(app_for(&server), "GET", "/meta", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rd_endpoint"], format!("{}{SERVICE_PATH}", server.uri()));
    assert_eq!(body["default_headers"]["Content-Type"], SOAP_CONTENT_TYPE);
}

#[tokio::test]
async fn test_rest_single_lookup() {
    let server = MockServer::start().await;
    mount_soap(&server, 200, SINGLE_RESPONSE).await;

    let (status, body) = call(
        app_for(&server),
        "POST",
        "/vat/service",
        Some(json!({"TIN": "0105536000000"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["NID"], "0105536000000");
    assert_eq!(body["data"][0]["PostCode"], "10500");
    assert_eq!(body["data"][0]["BuildingName"], "-");
    assert_eq!(body["data"][0].as_object().unwrap().len(), rd_vat::FIELD_COUNT);
    assert_eq!(body["meta"]["mode"], "single");
    assert!(body["raw_xml"].as_str().unwrap().contains("ServiceResult"));
}

#[tokio::test]
async fn test_rest_batch_lookup() {
    let server = MockServer::start().await;
    mount_soap(&server, 200, BATCH_RESPONSE).await;

    let (status, body) = call(
        app_for(&server),
        "POST",
        "/vat/service-batch",
        Some(json!({"TINs": ["1111111111111", "2222222222222"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][1]["NID"], "2222222222222");
    assert_eq!(body["meta"]["mode"], "batch");
}

#[tokio::test]
async fn test_rest_empty_batch_is_bad_request() {
    let server = MockServer::start().await;

    let (status, body) = call(
        app_for(&server),
        "POST",
        "/vat/service-batch",
        Some(json!({"TINs": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("TINs"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rest_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    mount_soap(&server, 503, "busy").await;

    let (status, body) = call(
        app_for(&server),
        "POST",
        "/vat/service",
        Some(json!({"TIN": "0105536000000"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("VAT Service error: "));

    let (status, body) = call(
        app_for(&server),
        "POST",
        "/vat/service-batch",
        Some(json!({"TINs": ["1"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("VAT Service batch error: "));
}

#[tokio::test]
async fn test_soap_raw_passes_status_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/raw"))
        .and(header("content-type", SOAP_CONTENT_TYPE))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("x-upstream", "rd")
                .set_body_string("<fault/>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = call(
        app_for(&server),
        "POST",
        "/soap/raw",
        Some(json!({"xml": "<x/>", "url": format!("{}/raw", server.uri())})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status_code"], 500);
    assert_eq!(body["text"], "<fault/>");
    assert_eq!(body["headers"]["x-upstream"], "rd");
}

#[tokio::test]
async fn test_raw_client_adds_content_type_when_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/raw"))
        .and(header("content-type", SOAP_CONTENT_TYPE))
        .and(header("soapaction", "Service"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = SoapClient::new(&ProxyConfig::resolve(Some(&server.uri()), Some(5)));
    let headers = BTreeMap::from([("SOAPAction".to_string(), "Service".to_string())]);
    let reply = client
        .post_raw(&format!("{}/raw", server.uri()), "<x/>", &headers)
        .await
        .unwrap();

    assert_eq!(reply.status_code, 200);
    assert_eq!(reply.text, "ok");
}

#[tokio::test]
async fn test_concurrent_rest_lookups() {
    let server = MockServer::start().await;
    mount_soap(&server, 200, SINGLE_RESPONSE).await;
    let app = app_for(&server);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            call(app, "POST", "/vat/service", Some(json!({"TIN": "0105536000000"}))).await
        }));
    }

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["NID"], "0105536000000");
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 8);
}
