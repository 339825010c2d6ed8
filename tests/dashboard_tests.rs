use axum::http::{Method, StatusCode};
use serde_json::json;

use mandates_backend::models::{
    ScanResultCreate, ScanResultStatus, ScanResultUpdate, ScanType, Severity,
};
use mandates_backend::repositories::ScanResultRepository;

mod common;
use common::{create_test_app, json_body, TestApp};

async fn create_repo(app: &TestApp, token: &str, external_id: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/repositories",
            Some(token),
            Some(json!({
                "external_id": external_id,
                "name": format!("repo-{external_id}"),
                "full_name": format!("acme/repo-{external_id}"),
                "clone_url": format!("https://github.com/acme/repo-{external_id}.git"),
                "provider": "github"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["id"].as_str().unwrap().to_string()
}

fn scan_row(repo_id: &str, scan_type: ScanType) -> ScanResultCreate {
    ScanResultCreate {
        repository_id: repo_id.to_string(),
        scan_type,
        title: "row".to_string(),
        description: None,
        severity: None,
        status: ScanResultStatus::Open,
        file_path: None,
        line_number: None,
        package_name: None,
        current_version: None,
        recommended_version: None,
        coverage_percentage: None,
        rule_id: None,
        metadata_json: None,
    }
}

fn security_row(repo_id: &str, severity: Severity, status: ScanResultStatus) -> ScanResultCreate {
    let mut row = scan_row(repo_id, ScanType::Security);
    row.severity = Some(severity);
    row.status = status;
    row
}

fn coverage_row(repo_id: &str, percentage: f64) -> ScanResultCreate {
    let mut row = scan_row(repo_id, ScanType::Coverage);
    row.status = ScanResultStatus::Resolved;
    row.coverage_percentage = Some(percentage);
    row
}

async fn fetch_metrics(app: &TestApp, token: &str) -> serde_json::Value {
    let response = app
        .request(Method::GET, "/dashboard/metrics", Some(token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn test_metrics_for_empty_account() {
    let app = create_test_app().await;
    let (_user_id, token) = app.register_user("alice@example.com", "pw").await;

    let metrics = fetch_metrics(&app, &token).await;
    assert_eq!(metrics["total_repositories"], 0);
    assert_eq!(metrics["pending_updates"], 0);
    assert_eq!(metrics["vulnerabilities"], 0);
    assert_eq!(metrics["test_coverage"], "0%");
}

#[tokio::test]
async fn test_metrics_coverage_is_rounded_mean() {
    let app = create_test_app().await;
    let (_user_id, token) = app.register_user("alice@example.com", "pw").await;
    let repo_id = create_repo(&app, &token, "1").await;

    let store = &app.state.scan_result_repository;
    store.insert(&coverage_row(&repo_id, 70.0)).await.unwrap();
    store.insert(&coverage_row(&repo_id, 80.0)).await.unwrap();

    let metrics = fetch_metrics(&app, &token).await;
    assert_eq!(metrics["total_repositories"], 1);
    assert_eq!(metrics["test_coverage"], "75%");
}

#[tokio::test]
async fn test_metrics_pending_updates_decrement_on_resolution() {
    let app = create_test_app().await;
    let (_user_id, token) = app.register_user("alice@example.com", "pw").await;
    let repo_id = create_repo(&app, &token, "1").await;

    let store = &app.state.scan_result_repository;
    let version_result = store.insert(&scan_row(&repo_id, ScanType::Version)).await.unwrap();

    let metrics = fetch_metrics(&app, &token).await;
    assert_eq!(metrics["pending_updates"], 1);

    app.state
        .scan_service
        .update_scan_result(
            &version_result.id,
            &ScanResultUpdate {
                status: Some(ScanResultStatus::Resolved),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let metrics = fetch_metrics(&app, &token).await;
    assert_eq!(metrics["pending_updates"], 0);
}

#[tokio::test]
async fn test_metrics_vulnerabilities_count_open_high_and_critical() {
    let app = create_test_app().await;
    let (_user_id, token) = app.register_user("alice@example.com", "pw").await;
    let repo_id = create_repo(&app, &token, "1").await;

    let store = &app.state.scan_result_repository;
    store
        .insert(&security_row(&repo_id, Severity::Critical, ScanResultStatus::Open))
        .await
        .unwrap();
    store
        .insert(&security_row(&repo_id, Severity::High, ScanResultStatus::Open))
        .await
        .unwrap();
    // Below threshold or not open: excluded.
    store
        .insert(&security_row(&repo_id, Severity::Medium, ScanResultStatus::Open))
        .await
        .unwrap();
    store
        .insert(&security_row(&repo_id, Severity::Critical, ScanResultStatus::Resolved))
        .await
        .unwrap();

    let metrics = fetch_metrics(&app, &token).await;
    assert_eq!(metrics["vulnerabilities"], 2);
}

#[tokio::test]
async fn test_metrics_are_scoped_per_user() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.register_user("alice@example.com", "pw").await;
    let (_bob, bob_token) = app.register_user("bob@example.com", "pw").await;

    let alice_repo = create_repo(&app, &alice_token, "1").await;
    let store = &app.state.scan_result_repository;
    store
        .insert(&security_row(&alice_repo, Severity::Critical, ScanResultStatus::Open))
        .await
        .unwrap();
    store.insert(&scan_row(&alice_repo, ScanType::Version)).await.unwrap();

    let bob_metrics = fetch_metrics(&app, &bob_token).await;
    assert_eq!(bob_metrics["total_repositories"], 0);
    assert_eq!(bob_metrics["pending_updates"], 0);
    assert_eq!(bob_metrics["vulnerabilities"], 0);

    let alice_metrics = fetch_metrics(&app, &alice_token).await;
    assert_eq!(alice_metrics["total_repositories"], 1);
    assert_eq!(alice_metrics["pending_updates"], 1);
    assert_eq!(alice_metrics["vulnerabilities"], 1);
}

#[tokio::test]
async fn test_metrics_require_auth() {
    let app = create_test_app().await;
    let response = app
        .request(Method::GET, "/dashboard/metrics", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
