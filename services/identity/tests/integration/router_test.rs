use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use chrono::Utc;
use httpmock::prelude::*;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};

use biovault_identity::infra::face::HttpFaceClient;
use biovault_identity::infra::voice::{API_VERSION, AzureVoiceClient};
use biovault_identity::usecase::password::hash_password;
use biovault_identity::router::build_router;
use biovault_identity::state::AppState;
use biovault_identity_schema::users;

fn user_model() -> users::Model {
    let now = Utc::now();
    users::Model {
        id: 1,
        name: Some("Alice".into()),
        email: "alice@example.com".into(),
        username: "alice".into(),
        password_hash: None,
        otp: None,
        otp_expires_at: None,
        face_embedding_path: Some("known_faces/alice.jpg".into()),
        voice_profile_id: None,
        created_at: now,
        updated_at: now,
    }
}

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn server_with(
    db: DatabaseConnection,
    voice_endpoint: &str,
    max_upload_bytes: usize,
) -> TestServer {
    let http = reqwest::Client::new();
    let state = AppState {
        db: Arc::new(db),
        face: HttpFaceClient::new(http.clone(), UNREACHABLE),
        voice: AzureVoiceClient::new(http, voice_endpoint, "test-key"),
        otp_ttl_secs: 300,
        cors_allowed_origin: HeaderValue::from_static("http://localhost:3000"),
        max_upload_bytes,
    };
    TestServer::new(build_router(state)).unwrap()
}

/// Biometric services are never reached by requests sent to this server.
fn server(db: DatabaseConnection) -> TestServer {
    server_with(db, UNREACHABLE, 1024 * 1024)
}

fn wav_part(len: usize) -> Part {
    Part::bytes(Bytes::from(vec![0u8; len]))
        .file_name("sample.wav")
        .mime_type("audio/wav")
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn db_with_users(rows: Vec<users::Model>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows])
        .into_connection()
}

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let server = server(empty_db());

    let resp = server.get("/healthz").await;

    resp.assert_status_ok();
    resp.assert_json(&json!({ "status": "ok" }));
    let request_id = resp.header("x-request-id");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn should_map_malformed_json_to_bad_request() {
    let server = server(empty_db());

    let resp = server
        .post("/api/register")
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "BAD_REQUEST");
}

#[tokio::test]
async fn should_reject_duplicate_username_with_conflict() {
    let server = server(db_with_users(vec![user_model()]));

    let resp = server
        .post("/api/register")
        .json(&json!({
            "name": "Alice",
            "email": "new@example.com",
            "username": "alice",
            "passwordHash": "pw"
        }))
        .await;

    resp.assert_status(StatusCode::CONFLICT);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "USERNAME_TAKEN");
    assert_eq!(body["message"], "Username 'alice' is already taken.");
}

#[tokio::test]
async fn should_reject_login_for_unknown_user() {
    let server = server(db_with_users(vec![]));

    let resp = server
        .post("/api/login")
        .json(&json!({ "username": "nobody", "password": "pw" }))
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["message"], "Invalid credentials.");
}

#[tokio::test]
async fn should_deny_unlock_for_unknown_user() {
    let server = server(db_with_users(vec![]));

    let resp = server
        .post("/api/auth/unlock")
        .json(&json!({ "userId": "nobody", "method": "face", "proof": "aW1hZ2U=" }))
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.assert_json(&json!({ "success": false, "confidence": 0.0, "token": null }));
}

#[tokio::test]
async fn should_unlock_through_fallback_method() {
    let server = server(db_with_users(vec![user_model()]));

    let resp = server
        .post("/api/auth/unlock")
        .json(&json!({ "username": "alice", "method": "pin", "proof": "" }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["confidence"], 0.96);
    assert!(body["token"].as_str().unwrap().starts_with("token_"));
}

#[tokio::test]
async fn should_return_user_view() {
    let server = server(db_with_users(vec![user_model()]));

    let resp = server.get("/api/users/1").await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["faceEnrolled"], true);
    assert_eq!(body["voiceEnrolled"], false);
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn should_return_not_found_when_deleting_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let server = server(db);

    let resp = server.delete("/api/users/99").await;

    resp.assert_status(StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn should_require_voice_profile_for_voice_unlock() {
    let server = server(db_with_users(vec![user_model()]));

    let form = MultipartForm::new().add_text("username", "alice").add_part(
        "audio",
        Part::bytes(b"RIFF....WAVE".as_slice())
            .file_name("unlock.wav")
            .mime_type("audio/wav"),
    );
    let resp = server.post("/api/auth/voice/unlock").multipart(form).await;

    resp.assert_status(StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["message"], "User not found or no voice profile enrolled.");
}

#[tokio::test]
async fn should_register_and_return_generated_id() {
    let created = users::Model {
        id: 5,
        email: "bob@example.com".into(),
        username: "bob".into(),
        face_embedding_path: None,
        ..user_model()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![], vec![], vec![created]])
        .into_connection();
    let server = server(db);

    let resp = server
        .post("/api/register")
        .json(&json!({
            "name": "Bob",
            "email": "bob@example.com",
            "username": "bob",
            "password": "hunter2"
        }))
        .await;

    resp.assert_status_ok();
    resp.assert_json(&json!({
        "success": true,
        "userId": 5,
        "message": "Registration successful!"
    }));
}

#[tokio::test]
async fn should_login_with_password_and_return_session() {
    let stored = users::Model {
        password_hash: Some(hash_password("hunter2").unwrap()),
        ..user_model()
    };
    let server = server(db_with_users(vec![stored]));

    let resp = server
        .post("/api/login")
        .json(&json!({ "username": "alice", "passwordHash": "hunter2" }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["userId"], 1);
    assert_eq!(body["username"], "alice");
    assert!(body["token"].as_str().unwrap().starts_with("token_"));
}

#[tokio::test]
async fn should_enroll_voice_through_speaker_recognition() {
    let azure = MockServer::start();
    let profiles = "/speaker-recognition/verification/text-independent/profiles";
    let create = azure.mock(|when, then| {
        when.method(POST)
            .path(profiles)
            .query_param("api-version", API_VERSION);
        then.status(201)
            .json_body(json!({ "profileId": "prof-9" }));
    });
    let enroll = azure.mock(|when, then| {
        when.method(POST)
            .path(format!("{profiles}/prof-9/enrollments"));
        then.status(201)
            .json_body(json!({ "enrollmentStatus": "Enrolled" }));
    });

    let enrolled = users::Model {
        voice_profile_id: Some("prof-9".into()),
        ..user_model()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model()], vec![enrolled]])
        .into_connection();
    let server = server_with(db, &azure.base_url(), 1024 * 1024);

    let form = MultipartForm::new()
        .add_text("username", "alice")
        .add_part("audio", wav_part(64));
    let resp = server.post("/api/auth/voice/enroll").multipart(form).await;

    resp.assert_status_ok();
    resp.assert_json(&json!({
        "success": true,
        "message": "Voice profile enrolled successfully."
    }));
    create.assert();
    enroll.assert();
}

#[tokio::test]
async fn should_reject_oversized_upload_with_413() {
    let server = server_with(db_with_users(vec![user_model()]), UNREACHABLE, 1024);

    let form = MultipartForm::new()
        .add_text("username", "alice")
        .add_part("audio", wav_part(8 * 1024));
    let resp = server.post("/api/auth/voice/unlock").multipart(form).await;

    resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "PAYLOAD_TOO_LARGE");
}
