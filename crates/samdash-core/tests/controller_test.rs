#![allow(clippy::unwrap_used)]
// Controller integration tests against a wiremock backend.

use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use samdash_core::{
    Command, CommandResult, Controller, ControllerConfig, CoreError, EntityKind, TelemetryQuery,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": true,
        "message": "ok",
        "data": data,
    }))
}

fn ack() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": true, "message": "done" }))
}

fn password(raw: &str) -> SecretString {
    raw.to_string().into()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/login/user"))
        .respond_with(ok(json!({
            "token": "tok-1",
            "user": { "id": 1, "userId": "U001", "username": "admin", "credential": "admin" }
        })))
        .mount(server)
        .await;
}

fn config(server: &MockServer, session_path: Option<std::path::PathBuf>) -> ControllerConfig {
    let mut config = ControllerConfig::new(Url::parse(&server.uri()).unwrap());
    config.session_path = session_path;
    config
}

async fn logged_in(server: &MockServer) -> Controller {
    mount_login(server).await;
    let controller = Controller::new(config(server, None)).unwrap();
    controller.login("admin", &password("hunter22")).await.unwrap();
    controller
}

/// In-memory location table behind the list/create/update/delete routes.
#[derive(Clone, Default)]
struct LocationTable {
    rows: Arc<Mutex<Vec<(i64, String)>>>,
}

impl LocationTable {
    fn seeded(names: &[&str]) -> Self {
        let rows = (1..).zip(names).map(|(id, n)| (id, (*n).to_string())).collect();
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    fn names(&self) -> Vec<String> {
        self.rows.lock().unwrap().iter().map(|(_, n)| n.clone()).collect()
    }
}

impl Respond for LocationTable {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut rows = self.rows.lock().unwrap();
        let route = request.url.path().to_string();
        let tail_id = || route.rsplit('/').next().and_then(|s| s.parse::<i64>().ok());

        if route.ends_with("/location/get") {
            let data: Vec<Value> = rows
                .iter()
                .map(|(id, name)| json!({ "id": id, "location": name }))
                .collect();
            return ok(Value::Array(data));
        }
        if route.ends_with("/location/create") {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let next = rows.iter().map(|(id, _)| *id).max().unwrap_or(0) + 1;
            rows.push((next, body["location"].as_str().unwrap().to_string()));
            return ack();
        }
        if route.contains("/location/update/") {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let id = tail_id().unwrap();
            if let Some(row) = rows.iter_mut().find(|(rid, _)| *rid == id) {
                row.1 = body["location"].as_str().unwrap().to_string();
                return ack();
            }
            return ResponseTemplate::new(404).set_body_json(json!({ "message": "not found" }));
        }
        if route.contains("/location/delete/") {
            let id = tail_id().unwrap();
            let before = rows.len();
            rows.retain(|(rid, _)| *rid != id);
            if rows.len() < before {
                return ack();
            }
            return ResponseTemplate::new(404).set_body_json(json!({ "message": "not found" }));
        }
        ResponseTemplate::new(404)
    }
}

async fn mount_locations(server: &MockServer, table: &LocationTable) {
    Mock::given(path_regex(r"^/api/v8/location/"))
        .respond_with(table.clone())
        .mount(server)
        .await;
}

fn location_names(controller: &Controller) -> Vec<String> {
    controller
        .locations_snapshot()
        .iter()
        .map(|l| l.name.clone())
        .collect()
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_short_password_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let controller = Controller::new(config(&server, None)).unwrap();

    let result = controller.login("admin", &password("hunter2")).await;

    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!controller.is_authenticated());
}

#[tokio::test]
async fn test_login_persists_and_restores_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/current/user"))
        .respond_with(ok(json!({
            "id": 1, "userId": "U001", "username": "admin", "credential": "admin"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let first = Controller::new(config(&server, Some(session_path.clone()))).unwrap();
    let session = first.login("admin", &password("hunter22")).await.unwrap();
    assert_eq!(session.user().username, "admin");
    assert!(session_path.exists());

    let second = Controller::new(config(&server, Some(session_path.clone()))).unwrap();
    let restored = second.restore_session().await.unwrap().unwrap();
    assert_eq!(restored.user().username, "admin");
    assert!(second.is_authenticated());
}

#[tokio::test]
async fn test_expired_session_is_discarded() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/current/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let first = Controller::new(config(&server, Some(session_path.clone()))).unwrap();
    first.login("admin", &password("hunter22")).await.unwrap();

    let second = Controller::new(config(&server, Some(session_path.clone()))).unwrap();
    assert!(second.restore_session().await.unwrap().is_none());
    assert!(!session_path.exists());
}

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let table = LocationTable::seeded(&["Depot"]);
    mount_locations(&server, &table).await;

    let controller = logged_in(&server).await;
    controller.refresh_locations().await.unwrap();
    assert_eq!(controller.locations_snapshot().len(), 1);

    controller.logout().await.unwrap();

    assert!(!controller.is_authenticated());
    assert!(controller.locations_snapshot().is_empty());
}

#[tokio::test]
async fn test_refresh_requires_session() {
    let server = MockServer::start().await;
    let controller = Controller::new(config(&server, None)).unwrap();

    let result = controller.refresh_users().await;

    assert!(matches!(result, Err(CoreError::NotAuthenticated)));
    let state = controller.fetch_state(EntityKind::Users);
    assert!(!state.loading);
    assert!(state.error.is_some());
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_location_create_rename_delete() {
    let server = MockServer::start().await;
    let table = LocationTable::default();
    mount_locations(&server, &table).await;
    let controller = logged_in(&server).await;

    controller
        .execute(Command::CreateLocation {
            name: "Gate-A".into(),
        })
        .await
        .unwrap();
    assert_eq!(location_names(&controller), vec!["Gate-A"]);
    let state = controller.fetch_state(EntityKind::Locations);
    assert_eq!(state.success.as_deref(), Some("Location 'Gate-A' created"));
    assert!(!state.loading);

    let id = controller.locations_snapshot()[0].id;
    controller
        .execute(Command::UpdateLocation {
            id,
            name: "Gate-A2".into(),
        })
        .await
        .unwrap();
    assert_eq!(location_names(&controller), vec!["Gate-A2"]);

    let result = controller
        .execute(Command::DeleteLocations { ids: vec![id] })
        .await
        .unwrap();
    assert_eq!(result, CommandResult::Deleted { count: 1 });
    assert!(location_names(&controller).is_empty());
    assert!(table.names().is_empty());
}

#[tokio::test]
async fn test_bulk_delete_removes_every_selected_row() {
    let server = MockServer::start().await;
    let table = LocationTable::seeded(&["A", "B", "C", "D"]);
    mount_locations(&server, &table).await;
    let controller = logged_in(&server).await;
    controller.refresh_locations().await.unwrap();
    let before = controller.locations_snapshot().len();

    controller
        .execute(Command::DeleteLocations { ids: vec![1, 3] })
        .await
        .unwrap();

    assert_eq!(controller.locations_snapshot().len(), before - 2);
    assert_eq!(location_names(&controller), vec!["B", "D"]);
}

#[tokio::test]
async fn test_partial_delete_reports_progress_and_refetches() {
    let server = MockServer::start().await;
    let table = LocationTable::seeded(&["A", "B", "C"]);
    mount_locations(&server, &table).await;
    let controller = logged_in(&server).await;

    let result = controller
        .execute(Command::DeleteLocations {
            ids: vec![1, 99, 3],
        })
        .await;

    match result {
        Err(CoreError::PartialDelete {
            deleted, failed, ..
        }) => {
            assert_eq!(deleted, vec!["1"]);
            assert_eq!(failed, "99");
        }
        other => panic!("expected PartialDelete, got: {other:?}"),
    }
    // Stops at the first failure; the list reflects what happened.
    assert_eq!(location_names(&controller), vec!["B", "C"]);
    let state = controller.fetch_state(EntityKind::Locations);
    assert!(state.error.is_some());
    assert!(state.success.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_empty_selection_never_reaches_backend() {
    let server = MockServer::start().await;
    let table = LocationTable::seeded(&["A"]);
    mount_locations(&server, &table).await;
    let controller = logged_in(&server).await;
    let requests_before = server.received_requests().await.unwrap().len();

    let result = controller
        .execute(Command::DeleteLocations { ids: Vec::new() })
        .await;

    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        requests_before
    );
    assert_eq!(table.names(), vec!["A"]);
}

#[tokio::test]
async fn test_rejected_create_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v6/email/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "Email already exists"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v6/emails/get"))
        .respond_with(ok(json!([{ "id": 1, "emailName": "ops@example.com" }])))
        .mount(&server)
        .await;
    let controller = logged_in(&server).await;

    let result = controller
        .execute(Command::CreateEmail {
            address: "ops@example.com".into(),
        })
        .await;

    assert!(matches!(result, Err(CoreError::Rejected { .. })));
    let state = controller.fetch_state(EntityKind::Emails);
    assert!(state.error.unwrap().contains("Email already exists"));
    assert_eq!(controller.emails_snapshot().len(), 1);
}

#[tokio::test]
async fn test_assign_devices_refreshes_user_permissions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v9/user-device/assign"))
        .respond_with(ack())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v9/user-device/get/device/5"))
        .respond_with(ok(json!([{ "id": 3, "samId": "SAM-003" }])))
        .mount(&server)
        .await;
    let controller = logged_in(&server).await;

    controller
        .execute(Command::AssignDevices {
            user_id: 5,
            device_ids: vec![3],
        })
        .await
        .unwrap();

    assert_eq!(controller.store().permissions_owner(), Some(5));
    let granted = controller.permissions_snapshot();
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0].sam_id, "SAM-003");
}

// ── Telemetry ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_and_export_telemetry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/all/data/SAM-001"))
        .respond_with(ok(json!([{
            "id": 1,
            "speed": 88.5,
            "category": "Over Speed",
            "samId": "SAM-001",
            "createdAt": "2024-06-15T10:30:00Z"
        }])))
        .mount(&server)
        .await;
    let controller = logged_in(&server).await;

    let records = controller.load_all_telemetry("SAM-001").await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_over_speed());
    assert_eq!(
        controller.fetch_state(EntityKind::Telemetry).success.as_deref(),
        Some("1 record loaded")
    );

    let dir = tempfile::tempdir().unwrap();
    let path = controller.export_loaded_telemetry(dir.path()).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("SAM-001_"));
    assert!(name.ends_with(".xlsx"));
}

#[tokio::test]
async fn test_duplicate_telemetry_ids_are_all_counted() {
    let server = MockServer::start().await;
    let reading = json!({
        "id": 7,
        "speed": 42.0,
        "category": "Normal",
        "samId": "SAM-004",
        "createdAt": "2024-06-15T10:30:00Z"
    });
    Mock::given(method("GET"))
        .and(path("/api/v3/all/data/SAM-004"))
        .respond_with(ok(json!([reading.clone(), reading])))
        .mount(&server)
        .await;
    let controller = logged_in(&server).await;

    let records = controller.load_all_telemetry("SAM-004").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        controller.fetch_state(EntityKind::Telemetry).success.as_deref(),
        Some("2 records loaded")
    );
}

#[tokio::test]
async fn test_empty_result_exports_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/filter/data/SAM-002"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    let controller = logged_in(&server).await;

    let query = TelemetryQuery {
        min_speed: Some(60.0),
        ..TelemetryQuery::all("SAM-002")
    };
    let records = controller.query_telemetry(query).await.unwrap();
    assert!(records.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let result = controller.export_loaded_telemetry(dir.path());
    assert!(matches!(result, Err(CoreError::NothingToExport)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
