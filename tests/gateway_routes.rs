//! End-to-end routing tests: real router, real adapters, Partner Center and
//! billing played by a wiremock server.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nce_transfer_webhooks::AppConfig;
use nce_transfer_webhooks::gateway::build_router;
use nce_transfer_webhooks::gateway::state::AppState;

const CUSTOMER_ID: &str = "6b1a1d34-0f53-4c4a-9d8e-b1e7e2d0a2f1";
const TRANSFER_ID: &str = "a9c6e1f0-3e3c-4b8e-8d0b-1f2e3d4c5b6a";

/// US and CA are configured, EU is left empty
fn config_yaml(server_uri: &str) -> String {
    format!(
        r#"
log_level: "info"
log_dir: "./logs"
log_file: "test.log"
use_json: false
rotation: "never"
gateway:
  host: "127.0.0.1"
  port: 0
http:
  timeout_secs: 5
partner_center:
  login_url: "{uri}"
  scope: "https://api.partnercenter.microsoft.com/.default"
  base_url: "{uri}"
  regions:
    us:
      client_id: "us-client"
      app_secret: "us-secret"
      tenant_id: "us-tenant"
      refresh_token: "us-refresh"
    ca:
      client_id: "ca-client"
      app_secret: "ca-secret"
      tenant_id: "ca-tenant"
      refresh_token: "ca-refresh"
billing:
  forward_url: "{uri}/billing/transfers"
  import_url: "{uri}/billing/import"
  import_api_key: "import-key"
"#,
        uri = server_uri
    )
}

fn transfer_json(status: &str, direction: i32) -> Value {
    json!({
        "id": TRANSFER_ID,
        "status": status,
        "transferType": 3,
        "customerEmailId": "it@contoso.com",
        "createdTime": "2024-05-01T10:00:00Z",
        "lastModifiedTime": "2024-05-02T10:00:00Z",
        "completedTime": "2024-05-02T10:00:00Z",
        "customerName": "Contoso",
        "customerTenantId": CUSTOMER_ID,
        "partnerTenantId": "partner-1",
        "sourcePartnerName": "Fabrikam",
        "sourcePartnerTenantId": "src-1",
        "targetPartnerName": "Northwind",
        "targetPartnerTenantId": "dst-1",
        "transferDirection": direction,
        "ignoreEligibilityCheck": false,
        "lastModifiedUser": "admin@fabrikam.com"
    })
}

fn webhook_event(event_name: &str) -> Value {
    json!({
        "EventName": event_name,
        "ResourceUri": format!("https://api.partnercenter.microsoft.com/v1/customers/{}/transfers/{}", CUSTOMER_ID, TRANSFER_ID),
        "ResourceName": "transfer",
        "AuditUri": format!("https://api.partnercenter.microsoft.com/v1/auditrecords/transfer_{}_{}", CUSTOMER_ID, TRANSFER_ID),
        "ResourceChangeUtcDate": "2024-05-02T10:00:00Z"
    })
}

async fn mount_token(server: &MockServer, tenant: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/token", tenant)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": format!("{}-access", tenant),
            "expires_on": (Utc::now() + Duration::hours(1)).timestamp().to_string()
        })))
        .mount(server)
        .await;
}

async fn mount_transfer(server: &MockServer, status: &str, direction: i32) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/customers/{}/transfers/{}",
            CUSTOMER_ID, TRANSFER_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(transfer_json(status, direction)))
        .mount(server)
        .await;
}

async fn app(server: &MockServer) -> Router {
    let config = AppConfig::from_yaml_str(&config_yaml(&server.uri())).unwrap();
    let state = Arc::new(AppState::from_config(&config).unwrap());
    build_router(state)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn requests_to(server: &MockServer, target: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == target)
        .count()
}

// ============================================================================
// Webhooks
// ============================================================================

#[tokio::test]
async fn test_completed_transfer_is_imported_and_forwarded() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    mount_transfer(&server, "Complete", 1).await;
    Mock::given(method("POST"))
        .and(path("/billing/import"))
        .and(header("x-api-key", "import-key"))
        .and(body_json(json!({ "organizationId": CUSTOMER_ID })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isSuccess": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/billing/transfers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-us",
        webhook_event("complete-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["transferId"], TRANSFER_ID);
    assert_eq!(body["data"]["decision"], "TRIGGER_IMPORT");
    assert_eq!(body["data"]["importSucceeded"], true);
    server.verify().await;
}

#[tokio::test]
async fn test_import_failure_still_returns_ok() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    mount_transfer(&server, "Complete", 1).await;
    Mock::given(method("POST"))
        .and(path("/billing/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": false,
            "error": "organization not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/billing/transfers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-us",
        webhook_event("complete-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["importSucceeded"], false);
    server.verify().await;
}

#[tokio::test]
async fn test_region_route_selects_credentials() {
    let server = MockServer::start().await;
    mount_token(&server, "ca-tenant").await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/customers/{}/transfers/{}",
            CUSTOMER_ID, TRANSFER_ID
        )))
        .and(header("authorization", "Bearer ca-tenant-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transfer_json("Expired", 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/billing/transfers"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-ca",
        webhook_event("fail-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["decision"], "FORWARD");
    assert!(body["data"].get("importSucceeded").is_none());
    assert_eq!(requests_to(&server, "/us-tenant/oauth2/token").await, 0);
    assert_eq!(requests_to(&server, "/billing/import").await, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_premature_update_is_conflict() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    mount_transfer(&server, "Complete", 1).await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-us",
        webhook_event("update-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4091);
    assert_eq!(
        body["msg"],
        "status is Complete but the completing event has not yet arrived"
    );
    assert_eq!(requests_to(&server, "/billing/transfers").await, 0);
}

#[tokio::test]
async fn test_outgoing_transfer_is_conflict() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    mount_transfer(&server, "Complete", 2).await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-us",
        webhook_event("complete-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["msg"], "not an incoming transfer");
    assert_eq!(requests_to(&server, "/billing/import").await, 0);
    assert_eq!(requests_to(&server, "/billing/transfers").await, 0);
}

#[tokio::test]
async fn test_unconfigured_region_fails_before_network() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-eu",
        webhook_event("complete-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 5000);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_downstream_failure_is_internal_error() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    mount_transfer(&server, "Expired", 1).await;
    Mock::given(method("POST"))
        .and(path("/billing/transfers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-us",
        webhook_event("fail-transfer"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "internal error");
}

#[tokio::test]
async fn test_malformed_webhook_body_is_bad_request() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        app(&server).await,
        "/transfer-webhook-us",
        json!({ "EventName": "complete-transfer" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_audit_uri_is_internal_error() {
    let server = MockServer::start().await;
    let mut event = webhook_event("complete-transfer");
    event["AuditUri"] = "".into();

    let (status, body) = post_json(app(&server).await, "/transfer-webhook-us", event).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 5000);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transfer_fetch_timeout_is_internal_error() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/customers/{}/transfers/{}",
            CUSTOMER_ID, TRANSFER_ID
        )))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(transfer_json("Expired", 1))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    // http.timeout_secs is the smallest configurable unit
    let yaml = config_yaml(&server.uri()).replace("timeout_secs: 5", "timeout_secs: 1");
    let config = AppConfig::from_yaml_str(&yaml).unwrap();
    let app = build_router(Arc::new(AppState::from_config(&config).unwrap()));

    let (status, body) = post_json(app, "/transfer-webhook-us", webhook_event("fail-transfer")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "internal error");
    assert_eq!(requests_to(&server, "/billing/transfers").await, 0);
}

#[tokio::test]
async fn test_unknown_region_route_is_not_found() {
    let server = MockServer::start().await;

    let response = app(&server)
        .await
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transfer-webhook-apac")
                .header("content-type", "application/json")
                .body(Body::from(webhook_event("complete-transfer").to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Create transfer
// ============================================================================

fn create_request() -> Value {
    json!({
        "tenantRegion": "US",
        "customerId": CUSTOMER_ID,
        "sourcePartnerTenantId": "11111111-2222-3333-4444-555555555555",
        "sourcePartnerName": "Fabrikam",
        "customerEmailId": "it@contoso.com",
        "customerName": "Contoso"
    })
}

#[tokio::test]
async fn test_create_transfer() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/customers/{}/transfers", CUSTOMER_ID)))
        .and(header("authorization", "Bearer us-tenant-access"))
        .respond_with(ResponseTemplate::new(201).set_body_json(transfer_json("Active", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server).await, "/create-transfer", create_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transferId"], TRANSFER_ID);
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["data"]["customerTenantId"], CUSTOMER_ID);
    server.verify().await;
}

#[tokio::test]
async fn test_create_transfer_sends_new_commerce_type() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/customers/{}/transfers", CUSTOMER_ID)))
        .and(wiremock::matchers::body_partial_json(json!({
            "transferType": 3,
            "sourcePartnerName": "Fabrikam",
            "customerEmailId": "it@contoso.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(transfer_json("Active", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _) = post_json(app(&server).await, "/create-transfer", create_request()).await;

    assert_eq!(status, StatusCode::OK);
    server.verify().await;
}

#[tokio::test]
async fn test_create_transfer_validation() {
    let server = MockServer::start().await;

    let mut bad_email = create_request();
    bad_email["customerEmailId"] = "nope".into();
    let (status, body) = post_json(app(&server).await, "/create-transfer", bad_email).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);

    let mut bad_id = create_request();
    bad_id["customerId"] = "not-a-uuid".into();
    let (status, _) = post_json(app(&server).await, "/create-transfer", bad_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_transfer_upstream_failure() {
    let server = MockServer::start().await;
    mount_token(&server, "us-tenant").await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/customers/{}/transfers", CUSTOMER_ID)))
        .respond_with(ResponseTemplate::new(400).set_body_string("transfer already exists"))
        .mount(&server)
        .await;

    let (status, body) = post_json(app(&server).await, "/create-transfer", create_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 5000);
}

// ============================================================================
// System
// ============================================================================

#[tokio::test]
async fn test_health_and_docs() {
    let server = MockServer::start().await;

    let (status, body) = send(
        app(&server).await,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["timestamp_ms"].as_u64().unwrap() > 0);

    let (status, body) = send(
        app(&server).await,
        Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/transfer-webhook-{region}"].is_object());
}
