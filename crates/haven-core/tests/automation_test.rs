#![allow(clippy::unwrap_used)]
// Integration tests for automation edit/trigger/refresh validation.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use haven_api::ApiClient;
use haven_core::{Automation, CoreError, Stateful};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<ApiClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    (server, client)
}

fn automation(client: Arc<ApiClient>) -> Automation {
    Automation::new(
        client,
        json!({"id": "3", "name": "Goodnight", "enabled": false}),
    )
    .unwrap()
}

// ── enable ──────────────────────────────────────────────────────────

#[tokio::test]
async fn enable_commits_full_echoed_state() {
    let (server, client) = setup().await;
    let mut automation = automation(client);

    Mock::given(method("PATCH"))
        .and(path("/api/v1/automations/3"))
        .and(body_json(json!({"enabled": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "3", "name": "Goodnight", "enabled": true, "version": 2}
        ])))
        .mount(&server)
        .await;

    automation.enable(true).await.unwrap();

    assert!(automation.enabled());
    assert_eq!(automation.get_value("version"), Some(&json!(2)));
}

#[tokio::test]
async fn enable_flag_mismatch_is_invalid_edit() {
    let (server, client) = setup().await;
    let mut automation = automation(client);

    Mock::given(method("PATCH"))
        .and(path("/api/v1/automations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "3", "enabled": false}
        ])))
        .mount(&server)
        .await;

    let result = automation.enable(true).await;

    assert!(
        matches!(result, Err(CoreError::InvalidEditResponse)),
        "expected InvalidEditResponse, got: {result:?}"
    );
    assert!(!automation.enabled(), "snapshot must be unchanged");
}

#[tokio::test]
async fn enable_id_mismatch_is_invalid_edit() {
    let (server, client) = setup().await;
    let mut automation = automation(client);

    Mock::given(method("PATCH"))
        .and(path("/api/v1/automations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "99", "enabled": true}
        ])))
        .mount(&server)
        .await;

    let result = automation.enable(true).await;

    assert!(matches!(result, Err(CoreError::InvalidEditResponse)));
    assert!(!automation.enabled(), "snapshot must be unchanged");
}

#[tokio::test]
async fn enable_accepts_numeric_echoed_id() {
    let (server, client) = setup().await;
    let mut automation = automation(client);

    // Some endpoints echo the id as a bare number.
    Mock::given(method("PATCH"))
        .and(path("/api/v1/automations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "enabled": true}
        ])))
        .mount(&server)
        .await;

    automation.enable(true).await.unwrap();
    assert!(automation.enabled());
}

#[tokio::test]
async fn enable_rejects_plural_response() {
    let (server, client) = setup().await;
    let mut automation = automation(client);

    Mock::given(method("PATCH"))
        .and(path("/api/v1/automations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "3", "enabled": true},
            {"id": "4", "enabled": true}
        ])))
        .mount(&server)
        .await;

    let result = automation.enable(true).await;

    assert!(
        matches!(result, Err(CoreError::MalformedResponse { .. })),
        "expected MalformedResponse, got: {result:?}"
    );
}

// ── trigger ─────────────────────────────────────────────────────────

#[tokio::test]
async fn trigger_posts_to_apply_endpoint() {
    let (server, client) = setup().await;
    let automation = automation(client);

    Mock::given(method("POST"))
        .and(path("/api/v1/automations/3/apply"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    automation.trigger().await.unwrap();
}

#[tokio::test]
async fn trigger_propagates_transport_failure() {
    let (server, client) = setup().await;
    let automation = automation(client);

    Mock::given(method("POST"))
        .and(path("/api/v1/automations/3/apply"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = automation.trigger().await;

    assert!(matches!(
        result,
        Err(CoreError::Api(haven_api::Error::Api { status: 503, .. }))
    ));
}

// ── refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_replaces_snapshot_wholesale() {
    let (server, client) = setup().await;
    let mut automation = Automation::new(
        client,
        json!({"id": "3", "name": "Goodnight", "enabled": false, "stale": true}),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/automations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "3", "name": "Goodnight v2", "enabled": true}
        ])))
        .mount(&server)
        .await;

    automation.refresh().await.unwrap();

    assert_eq!(automation.name(), Some("Goodnight v2"));
    assert!(automation.enabled());
    assert_eq!(
        automation.get_value("stale"),
        None,
        "refresh is a replace, not a merge"
    );
}

#[tokio::test]
async fn refresh_id_mismatch_is_fatal() {
    let (server, client) = setup().await;
    let mut automation = automation(client);

    Mock::given(method("GET"))
        .and(path("/api/v1/automations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "99", "enabled": true}
        ])))
        .mount(&server)
        .await;

    let result = automation.refresh().await;

    assert!(
        matches!(result, Err(CoreError::IdentityMismatch { .. })),
        "expected IdentityMismatch, got: {result:?}"
    );
    assert!(!automation.enabled(), "snapshot must be unchanged");
}

// ── Accessors ───────────────────────────────────────────────────────

#[tokio::test]
async fn desc_summarizes_the_automation() {
    let (_server, client) = setup().await;
    let automation = automation(client);

    assert_eq!(automation.desc(), "Goodnight (ID: 3, Enabled: false)");
}

#[tokio::test]
#[allow(deprecated)]
async fn deprecated_aliases_still_work() {
    let (_server, client) = setup().await;
    let automation = automation(client);

    assert_eq!(automation.automation_id(), automation.id());
    assert_eq!(automation.is_enabled(), automation.enabled());
}
