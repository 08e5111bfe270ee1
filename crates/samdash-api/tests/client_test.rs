#![allow(clippy::unwrap_used)]
// Integration tests for `SamClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use samdash_api::{CredentialLevel, DeviceFields, Error, NewUser, SamClient, TelemetryFilter};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SamClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = SamClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": true,
        "message": "ok",
        "data": data,
    }))
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login/user"))
        .and(body_json(json!({ "username": "admin", "password": "hunter22" })))
        .respond_with(ok(json!({
            "token": "tok-123",
            "user": { "id": 1, "userId": "U001", "username": "admin", "credential": "Admin" }
        })))
        .mount(&server)
        .await;

    let secret: SecretString = "hunter22".to_string().into();
    let login = client.login("admin", &secret).await.unwrap();

    assert_eq!(login.token, "tok-123");
    let user = login.user.unwrap();
    assert_eq!(user.username, "admin");
    assert_eq!(user.credential, Some(CredentialLevel::Admin));
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": false,
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let secret: SecretString = "wrong-password".to_string().into();
    let result = client.login("admin", &secret).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Invalid username or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_failed_status_flag_is_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "User not found"
        })))
        .mount(&server)
        .await;

    let secret: SecretString = "whatever1".to_string().into();
    let result = client.login("ghost", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/current/user"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ok(json!({ "id": 7, "username": "ops", "credential": "Operator" })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_token("tok-abc".to_string().into());
    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.credential, Some(CredentialLevel::Operator));
}

#[tokio::test]
async fn test_logout_clears_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/logout"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    client.set_token("tok-abc".to_string().into());
    client.logout().await.unwrap();

    assert!(!client.has_token());
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_users_ignores_password_field() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/getAll/user"))
        .respond_with(ok(json!([
            { "id": 1, "userId": "U001", "username": "alice", "password": "plain", "credential": "Admin" },
            { "id": "2", "username": "bob", "credential": "guest" }
        ])))
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].id, 2);
    assert_eq!(users[1].credential, Some(CredentialLevel::Guest));
    let serialized = serde_json::to_string(&users[0]).unwrap();
    assert!(!serialized.contains("plain"));
}

#[tokio::test]
async fn test_register_user_sends_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/register/user"))
        .and(body_json(json!({
            "username": "carol",
            "password": "longenough",
            "credential": "Guest",
            "userId": "U010"
        })))
        .respond_with(ok(json!({ "id": 10 })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .register_user(&NewUser {
            user_id: Some("U010".into()),
            username: "carol".into(),
            password: "longenough".to_string().into(),
            credential: CredentialLevel::Guest,
        })
        .await
        .unwrap();

    assert_eq!(ack.message.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_delete_user_path() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/delete/user/42"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_user(42).await.unwrap();
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_failed_status_flag_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v6/emails/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "database unavailable"
        })))
        .mount(&server)
        .await;

    let result = client.list_emails().await;

    match result {
        Err(Error::Api { message, status }) => {
            assert_eq!(message, "database unavailable");
            assert_eq!(status, None);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v7/logs/get"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.list_logs().await.unwrap_err();

    assert!(
        matches!(err, Error::Api { status: Some(500), .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_wrong_shape_is_malformed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v8/location/get"))
        .respond_with(ok(json!({ "rows": [] })))
        .mount(&server)
        .await;

    let result = client.list_locations().await;

    assert!(
        matches!(result, Err(Error::MalformedPayload { .. })),
        "expected MalformedPayload, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_data_is_malformed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/getAll/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 200 })))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    assert!(
        matches!(result, Err(Error::MalformedPayload { .. })),
        "expected MalformedPayload, got: {result:?}"
    );
}

#[tokio::test]
async fn test_not_json_is_malformed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/system/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.system_info().await;

    match result {
        Err(Error::MalformedPayload { body, .. }) => assert!(body.contains("gateway")),
        other => panic!("expected MalformedPayload, got: {other:?}"),
    }
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/getAll/device"))
        .respond_with(ok(json!([{
            "id": 3,
            "deviceId": "D-3",
            "samId": "SAM-003",
            "deviceIP": "10.0.0.3",
            "cameraIP": "10.0.1.3",
            "cameraPassword": "secret",
            "cameraType": "ANPR",
            "location": "Gate-A"
        }])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].sam_id, "SAM-003");
    assert_eq!(devices[0].device_ip.as_deref(), Some("10.0.0.3"));
    assert_eq!(devices[0].camera_ip.as_deref(), Some("10.0.1.3"));
    assert_eq!(devices[0].location.as_deref(), Some("Gate-A"));
}

#[tokio::test]
async fn test_add_device_omits_unset_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/add/device"))
        .and(body_json(json!({
            "samId": "SAM-009",
            "cameraPassword": "cam-pass",
            "location": "Depot"
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_device(&DeviceFields {
            sam_id: Some("SAM-009".into()),
            camera_password: Some("cam-pass".to_string().into()),
            location: Some("Depot".into()),
            ..DeviceFields::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_device_by_sam_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/delete/device/SAM%20009"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device("SAM 009").await.unwrap();
}

// ── Telemetry ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_filter_data_query_and_timestamps() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/filter/data/SAM-001"))
        .and(query_param("startDate", "2024-06-01"))
        .and(query_param("category", "over speed"))
        .respond_with(ok(json!([
            { "id": 1, "speed": 72.5, "category": "over speed", "samId": "SAM-001",
              "createdAt": "2024-06-15T10:30:00Z" },
            { "id": 2, "speed": 81.0, "category": "over speed", "samId": "SAM-001",
              "createdAt": "2024-06-15 11:00:00" }
        ])))
        .mount(&server)
        .await;

    let filter = TelemetryFilter {
        min_speed: Some(60.0),
        start_date: Some("2024-06-01".into()),
        category: Some("over speed".into()),
        ..TelemetryFilter::default()
    };
    let records = client.filter_data("SAM-001", &filter).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(records[0].created_at < records[1].created_at);
}

#[tokio::test]
async fn test_bad_timestamp_is_malformed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/all/data/SAM-001"))
        .respond_with(ok(json!([
            { "id": 1, "speed": 50, "samId": "SAM-001", "createdAt": "yesterday" }
        ])))
        .mount(&server)
        .await;

    let result = client.all_data("SAM-001").await;

    assert!(matches!(result, Err(Error::MalformedPayload { .. })));
}

// ── Locations / Emails ──────────────────────────────────────────────

#[tokio::test]
async fn test_location_crud_paths() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v8/location/create"))
        .and(body_json(json!({ "location": "Gate-A" })))
        .respond_with(ok(json!({ "id": 5, "location": "Gate-A" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v8/location/update/5"))
        .and(body_json(json!({ "location": "Gate-A2" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v8/location/delete/5"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.create_location("Gate-A").await.unwrap();
    client.update_location(5, "Gate-A2").await.unwrap();
    client.delete_location(5).await.unwrap();
}

#[tokio::test]
async fn test_create_email() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v6/email/create"))
        .and(body_json(json!({ "emailName": "alerts@example.com" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.create_email("alerts@example.com").await.unwrap();
}

// ── Permissions ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_assign_and_revoke_devices() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v9/user-device/assign"))
        .and(body_json(json!({ "userId": 2, "deviceId": [3, 4] })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v9/user-device/delete"))
        .and(body_json(json!({ "userId": 2, "deviceId": [4] })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.assign_devices(2, &[3, 4]).await.unwrap();
    client.revoke_devices(2, &[4]).await.unwrap();
}

#[tokio::test]
async fn test_devices_for_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/user-device/get/device/2"))
        .respond_with(ok(json!([{ "id": 3, "samId": "SAM-003" }])))
        .mount(&server)
        .await;

    let devices = client.devices_for_user(2).await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, 3);
}
