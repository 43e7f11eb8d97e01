//! Integration tests for the Notification Hubs client over real HTTP
//!
//! These tests run the default `reqwest` transport against a local
//! `wiremock` server and cover:
//! 1. Request shape on the wire (path, method, mandatory headers, body)
//! 2. Response header extraction on 201 Created
//! 3. Error classification for rejected sends and transport failures
//! 4. Configuration loaded from `NOTIFICATION_HUB_*` environment variables

use nova_notification_hubs::{
    HubConfig, NotificationHub, NotificationHubError, NotificationRequest, NotificationResponse,
    PayloadMode,
};
use serial_test::serial;
use std::collections::HashMap;
use wiremock::matchers::{body_string, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "c2VjcmV0";

/// `http://` endpoint pointing at the mock server; only `sb://` is rewritten
fn connection_string(server: &MockServer) -> String {
    format!(
        "Endpoint={}/;SharedAccessKeyName=DefaultFullSharedAccessSignature;SharedAccessKey={}",
        server.uri(),
        KEY
    )
}

#[tokio::test]
async fn test_direct_send_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/myhub/messages/api-version=2015-01&direct=true"))
        .and(header("ServiceBusNotification-Format", "apple"))
        .and(header("ServiceBusNotification-DeviceHandle", "a1b2c3d4e5f6"))
        .and(header("Content-Type", "application/json;charset=utf-8"))
        .and(header_regex(
            "Authorization",
            r"^SharedAccessSignature sr=http%3a%2f%2f127\.0\.0\.1%3a\d+%2f&sig=[A-Za-z0-9%]+&se=\d+&skn=DefaultFullSharedAccessSignature$",
        ))
        .and(body_string(r#"{"aps":{"alert":"Hello"}}"#))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("TrackingId", "t1")
                .insert_header("Location", "loc1")
                .insert_header("x-ms-correlation-request-id", "c1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let hub = NotificationHub::new(&connection_string(&server), "myhub").unwrap();
    let request =
        NotificationRequest::create_apple_request_with_message(r#"{"aps":{"alert":"Hello"}}"#);

    let response = hub
        .send_direct_notification("a1b2c3d4e5f6", &request)
        .await
        .expect("send should succeed");

    assert_eq!(
        response,
        NotificationResponse {
            location: "loc1".to_string(),
            correlation_id: "c1".to_string(),
            tracking_id: "t1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_rejected_send_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("The channel URI is invalid"))
        .expect(1)
        .mount(&server)
        .await;

    let hub = NotificationHub::new(&connection_string(&server), "myhub").unwrap();

    let result = hub
        .send_direct_notification("device", &NotificationRequest::create_apple_request())
        .await;

    match result {
        Err(NotificationHubError::InvalidResponse { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "The channel URI is invalid");
        }
        other => panic!("expected InvalidResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_caller_headers_reach_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("apns-push-type", "background"))
        .and(header("ServiceBusNotification-Format", "apple"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let hub = NotificationHub::new(&connection_string(&server), "myhub").unwrap();
    let headers = HashMap::from([
        ("apns-push-type".to_string(), "background".to_string()),
        ("ServiceBusNotification-Format".to_string(), "windows".to_string()),
    ]);
    let request = NotificationRequest::create_apple_request_with_headers("{}", headers);

    let response = hub.send_direct_notification("device", &request).await.unwrap();
    assert_eq!(response, NotificationResponse::default());
}

#[tokio::test]
async fn test_headers_only_mode_sends_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let hub = NotificationHub::new(&connection_string(&server), "myhub")
        .unwrap()
        .with_payload_mode(PayloadMode::HeadersOnly);
    let request = NotificationRequest::create_fcm_request_with_message(r#"{"data":{}}"#);

    hub.send_direct_notification("device", &request).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_hub_is_transport_error() {
    // Bind then release a loopback port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let hub = NotificationHub::new(
        &format!(
            "Endpoint=http://127.0.0.1:{}/;SharedAccessKeyName=n;SharedAccessKey={}",
            port, KEY
        ),
        "myhub",
    )
    .unwrap();

    let result = hub
        .send_direct_notification("device", &NotificationRequest::create_apple_request())
        .await;

    assert!(matches!(result, Err(NotificationHubError::Transport(_))));
}

#[test]
#[serial]
fn test_hub_from_environment() {
    std::env::set_var(
        "NOTIFICATION_HUB_CONNECTION_STRING",
        "Endpoint=sb://h.example.net/;SharedAccessKeyName=n;SharedAccessKey=c2VjcmV0",
    );
    std::env::set_var("NOTIFICATION_HUB_NAME", "envhub");
    std::env::set_var("NOTIFICATION_HUB_PAYLOAD_MODE", "headers_only");

    let cfg = HubConfig::from_env().expect("config from env");
    let hub = NotificationHub::from_config(&cfg).expect("hub from config");

    assert_eq!(hub.hub_name(), "envhub");
    assert_eq!(hub.payload_mode(), PayloadMode::HeadersOnly);
    assert_eq!(
        hub.messages_url(),
        "https://h.example.net/envhub/messages/api-version=2015-01&direct=true"
    );

    std::env::remove_var("NOTIFICATION_HUB_CONNECTION_STRING");
    std::env::remove_var("NOTIFICATION_HUB_NAME");
    std::env::remove_var("NOTIFICATION_HUB_PAYLOAD_MODE");
}

#[test]
#[serial]
fn test_missing_environment_is_config_error() {
    std::env::remove_var("NOTIFICATION_HUB_CONNECTION_STRING");
    std::env::remove_var("NOTIFICATION_HUB_NAME");

    let result = HubConfig::from_env();
    assert!(matches!(result, Err(NotificationHubError::Config(_))));
}
