// Integration tests for `CareClient` using wiremock.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use carewatch_api::models::RawAlarmLevel;
use carewatch_api::transport::TransportConfig;
use carewatch_api::{CareClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CareClient) {
    let server = MockServer::start().await;
    let client = CareClient::with_token(
        server.uri().parse().unwrap(),
        SecretString::from("test-token".to_string()),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_cards_unwraps_envelope() {
    let (server, client) = setup().await;

    let event_id = Uuid::new_v4();
    let body = json!({
        "items": [
            {
                "card_id": "card-001",
                "card_type": "ActiveBed",
                "unit_type": "Facility",
                "card_name": "Room 101 Bed A",
                "card_address": "Building 1 / Floor 1",
                "devices": [
                    { "device_id": "dev-radar-1", "device_name": "Radar01", "device_type": 2, "binding_type": "direct" }
                ],
                "alarms": [
                    {
                        "event_id": event_id,
                        "event_type": "Fall",
                        "alarm_level": "L1",
                        "alarm_status": "active",
                        "triggered_at": 1_699_000_000_000_i64,
                        "triggered_by": "Radar01",
                        "device_id": "dev-radar-1"
                    }
                ],
                "heart": 72
            },
            {
                "card_id": "card-002",
                "card_type": "Location",
                "unit_type": "Home",
                "alarms": [
                    { "event_id": "e-2", "event_type": "LeftBed", "alarm_level": 2, "alarm_status": "acknowledged" }
                ]
            }
        ],
        "pagination": { "page": 1, "page_size": 50, "total": 2 }
    });

    Mock::given(method("GET"))
        .and(path("/api/monitors/vital-focus/cards"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let cards = client.list_cards().await.unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].card_id, "card-001");
    assert_eq!(cards[0].unit_type.as_deref(), Some("Facility"));
    assert_eq!(cards[0].devices[0].device_id, "dev-radar-1");
    assert_eq!(
        cards[0].alarms[0].alarm_level,
        Some(RawAlarmLevel::Text("L1".into()))
    );
    assert_eq!(
        cards[1].alarms[0].alarm_level,
        Some(RawAlarmLevel::Number(2))
    );
    assert_eq!(cards[1].alarms[0].alarm_status.as_deref(), Some("acknowledged"));
}

#[tokio::test]
async fn test_login_stores_token_and_returns_role() {
    let server = MockServer::start().await;
    let client = CareClient::new(server.uri().parse().unwrap(), &TransportConfig::default())
        .unwrap();

    let body = json!({
        "accessToken": "issued-token",
        "refreshToken": "refresh",
        "role": "Nurse",
        "userId": "u-1",
        "user_account": "nurse01",
        "tenant_id": "t-1",
        "tenant_name": "Sunrise Care"
    });

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    assert!(!client.has_token());

    let result = client
        .login("nurse01", &SecretString::from("pw".to_string()))
        .await
        .unwrap();

    assert_eq!(result.role.as_deref(), Some("Nurse"));
    assert_eq!(result.tenant_name.as_deref(), Some("Sunrise Care"));
    assert!(client.has_token());
}

#[tokio::test]
async fn test_acknowledge_alarm_posts_to_event() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alarm/events/e-42/acknowledge"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    client.acknowledge_alarm("e-42").await.unwrap();
}

// ── Failure-path tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_login_failure_maps_to_authentication_error() {
    let server = MockServer::start().await;
    let client = CareClient::new(server.uri().parse().unwrap(), &TransportConfig::default())
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let err = client
        .login("nurse01", &SecretString::from("wrong".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication { .. }));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_expired_token_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/monitors/vital-focus/cards"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_cards().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/monitors/vital-focus/cards"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.list_cards().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_missing_token_short_circuits() {
    let server = MockServer::start().await;
    let client = CareClient::new(server.uri().parse().unwrap(), &TransportConfig::default())
        .unwrap();

    // No mock mounted: the request must fail before reaching the wire.
    let err = client.list_cards().await.unwrap_err();
    assert!(matches!(err, Error::MissingToken));
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/monitors/vital-focus/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_cards().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}
