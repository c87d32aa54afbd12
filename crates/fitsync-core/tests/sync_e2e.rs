//! E2E tests for a full sync run.
//!
//! Both services are served by mockito; credentials and the token cache are
//! real files in a temp directory, loaded through `LiveOrchestrator`.

use chrono::NaiveDate;
use fitsync_core::{ApiError, Config, CoreError, LiveOrchestrator, SuccessPolicy};
use std::path::Path;

const SOURCE: &str = "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps";
const DATASET: &str = "1455580800000000000-1455667200000000000";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 2, 18).unwrap()
}

fn dataset_path() -> String {
    format!("/fitness/v1/users/me/dataSources/{SOURCE}/datasets/{DATASET}")
}

/// Write credential files and a fresh token, and point both endpoints at `base`.
fn config_for(dir: &Path, base: &str) -> Config {
    std::fs::write(
        dir.join("habitica.json"),
        r#"{"x-api-key": "key-1", "x-api-user": "user-1"}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("client_secret.json"),
        format!(
            r#"{{"installed": {{"client_id": "cid", "client_secret": "sec", "token_uri": "{base}/token"}}}}"#
        ),
    )
    .unwrap();
    let expires_at = chrono::Utc::now().timestamp() + 3600;
    std::fs::write(
        dir.join("token.json"),
        format!(
            r#"{{"access_token": "live-token", "refresh_token": "r", "expires_at": {expires_at}, "token_type": "Bearer", "scope": null}}"#
        ),
    )
    .unwrap();

    let mut config = Config::default();
    config.credentials.habitica = dir.join("habitica.json");
    config.credentials.client_secret = dir.join("client_secret.json");
    config.credentials.token_cache = dir.join("token.json");
    config.endpoints.fitness = format!("{base}/fitness/v1");
    config.endpoints.habitica = format!("{base}/api/v3");
    config.log_path = dir.join("fitsync.log");
    config
}

const LISTING: &str = r#"{"success": true, "data": [
    {"id": "t1", "text": "Groceries"},
    {"id": "abc123", "text": "1000 steps"}
]}"#;

#[tokio::test]
async fn test_two_points_score_task_once() {
    let mut server = mockito::Server::new_async().await;
    let fit = server
        .mock("GET", dataset_path().as_str())
        .match_header("authorization", "Bearer live-token")
        .with_status(200)
        .with_body(r#"{"point": [{"value": [{"intVal": 500}]}, {"value": [{"intVal": 750}]}]}"#)
        .create_async()
        .await;
    let listing = server
        .mock("GET", "/api/v3/tasks/user")
        .match_header("x-api-user", "user-1")
        .with_status(200)
        .with_body(LISTING)
        .create_async()
        .await;
    let score = server
        .mock("POST", "/api/v3/tasks/abc123/score/up")
        .match_header("x-api-key", "key-1")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let orchestrator = LiveOrchestrator::from_config(config_for(dir.path(), &server.url())).unwrap();
    let summary = orchestrator.execute(today()).await.unwrap();

    fit.assert_async().await;
    listing.assert_async().await;
    score.assert_async().await;
    assert_eq!(summary.total_steps, 1250);
    assert_eq!(summary.increment_count, 1);
    assert_eq!(summary.task_id.as_deref(), Some("abc123"));
    assert_eq!((summary.succeeded, summary.failed), (1, 0));
}

#[tokio::test]
async fn test_failed_increments_do_not_stop_replay() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", dataset_path().as_str())
        .with_status(200)
        .with_body(r#"{"point": [{"value": [{"intVal": 3200}]}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/tasks/user")
        .with_status(200)
        .with_body(LISTING)
        .create_async()
        .await;
    let score = server
        .mock("POST", "/api/v3/tasks/abc123/score/up")
        .with_status(201)
        .expect(3)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let orchestrator = LiveOrchestrator::from_config(config_for(dir.path(), &server.url())).unwrap();
    let summary = orchestrator.execute(today()).await.unwrap();

    score.assert_async().await;
    assert_eq!(summary.increment_count, 3);
    // 201 is not 200 under the default policy.
    assert_eq!((summary.succeeded, summary.failed), (0, 3));
}

#[tokio::test]
async fn test_any2xx_policy_accepts_created() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", dataset_path().as_str())
        .with_status(200)
        .with_body(r#"{"point": [{"value": [{"intVal": 2000}]}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/tasks/user")
        .with_status(200)
        .with_body(LISTING)
        .create_async()
        .await;
    server
        .mock("POST", "/api/v3/tasks/abc123/score/up")
        .with_status(201)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &server.url());
    config.success_policy = SuccessPolicy::Any2xx;
    let summary = LiveOrchestrator::from_config(config)
        .unwrap()
        .execute(today())
        .await
        .unwrap();

    assert_eq!((summary.succeeded, summary.failed), (2, 0));
}

#[tokio::test]
async fn test_unauthorized_listing_skips_increments() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", dataset_path().as_str())
        .with_status(200)
        .with_body(r#"{"point": [{"value": [{"intVal": 9000}]}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v3/tasks/user")
        .with_status(401)
        .create_async()
        .await;
    let score = server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let summary = LiveOrchestrator::from_config(config_for(dir.path(), &server.url()))
        .unwrap()
        .execute(today())
        .await
        .unwrap();

    score.assert_async().await;
    assert_eq!(summary.increment_count, 9);
    assert!(summary.task_id.is_none());
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_listing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", dataset_path().as_str())
        .with_status(500)
        .create_async()
        .await;
    let listing = server
        .mock("GET", "/api/v3/tasks/user")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = LiveOrchestrator::from_config(config_for(dir.path(), &server.url()))
        .unwrap()
        .execute(today())
        .await
        .unwrap_err();

    listing.assert_async().await;
    assert!(matches!(err, CoreError::Api(ApiError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_error_webhook_receives_fatal_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", dataset_path().as_str())
        .with_status(200)
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;
    let hook = server
        .mock("POST", "/hook")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({"level": "error"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &server.url());
    config.error_reporting.webhook_url = Some(format!("{}/hook", server.url()));
    let err = LiveOrchestrator::from_config(config)
        .unwrap()
        .execute(today())
        .await
        .unwrap_err();

    hook.assert_async().await;
    assert!(matches!(err, CoreError::Api(ApiError::MalformedResponse { .. })));
}
