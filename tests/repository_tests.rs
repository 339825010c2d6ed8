use axum::http::{Method, StatusCode};
use serde_json::json;

use mandates_backend::models::{
    ProviderAccountCreate, ScanResultCreate, ScanResultStatus, ScanType,
};
use mandates_backend::repositories::{ScanResultRepository, UserRepository};

mod common;
use common::{create_test_app, json_body, TestApp};

fn repo_payload(external_id: &str, name: &str) -> serde_json::Value {
    json!({
        "external_id": external_id,
        "name": name,
        "full_name": format!("acme/{name}"),
        "clone_url": format!("https://github.com/acme/{name}.git"),
        "provider": "github",
        "language": "Java"
    })
}

async fn create_repo(app: &TestApp, token: &str, external_id: &str, name: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/repositories",
            Some(token),
            Some(repo_payload(external_id, name)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_repository_defaults() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice@example.com", "pw").await;

    let response = app
        .request(
            Method::POST,
            "/repositories",
            Some(&token),
            Some(repo_payload("100", "widget")),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], user_id.as_str());
    assert_eq!(body["external_id"], "100");
    assert_eq!(body["scan_status"], "pending");
    assert_eq!(body["default_branch"], "main");
    assert_eq!(body["is_private"], false);
    assert!(body["coverage_percentage"].is_null());
}

#[tokio::test]
async fn test_duplicate_external_identity_fails_with_400() {
    let app = create_test_app().await;
    let (_user_id, token) = app.register_user("alice@example.com", "pw").await;

    create_repo(&app, &token, "100", "widget").await;

    let response = app
        .request(
            Method::POST,
            "/repositories",
            Some(&token),
            Some(repo_payload("100", "widget-again")),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_same_external_id_allowed_for_different_users() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.register_user("alice@example.com", "pw").await;
    let (_bob, bob_token) = app.register_user("bob@example.com", "pw").await;

    create_repo(&app, &alice_token, "100", "widget").await;
    create_repo(&app, &bob_token, "100", "widget").await;
}

#[tokio::test]
async fn test_list_returns_own_repositories_in_creation_order() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.register_user("alice@example.com", "pw").await;
    let (_bob, bob_token) = app.register_user("bob@example.com", "pw").await;

    create_repo(&app, &alice_token, "1", "first").await;
    create_repo(&app, &alice_token, "2", "second").await;
    create_repo(&app, &bob_token, "3", "other").await;

    let response = app
        .request(Method::GET, "/repositories", Some(&alice_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let repositories = body["repositories"].as_array().unwrap();

    assert_eq!(repositories.len(), 2);
    assert_eq!(repositories[0]["name"], "first");
    assert_eq!(repositories[1]["name"], "second");
}

#[tokio::test]
async fn test_get_repository_scoped_to_owner() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.register_user("alice@example.com", "pw").await;
    let (_bob, bob_token) = app.register_user("bob@example.com", "pw").await;

    let repo_id = create_repo(&app, &alice_token, "100", "widget").await;

    let response = app
        .request(
            Method::GET,
            &format!("/repositories/{repo_id}"),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Another user never sees it.
    let response = app
        .request(
            Method::GET,
            &format!("/repositories/{repo_id}"),
            Some(&bob_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::GET,
            "/repositories/no-such-id",
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_repository_scoped_to_owner() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.register_user("alice@example.com", "pw").await;
    let (_bob, bob_token) = app.register_user("bob@example.com", "pw").await;

    let repo_id = create_repo(&app, &alice_token, "100", "widget").await;

    // A foreign delete is a 404 and must not remove the row.
    let response = app
        .request(
            Method::DELETE,
            &format!("/repositories/{repo_id}"),
            Some(&bob_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::GET,
            &format!("/repositories/{repo_id}"),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The owner's delete succeeds.
    let response = app
        .request(
            Method::DELETE,
            &format!("/repositories/{repo_id}"),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Repository deleted successfully");

    let response = app
        .request(
            Method::GET,
            &format!("/repositories/{repo_id}"),
            Some(&alice_token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_repository_cascades_scan_results() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice@example.com", "pw").await;

    let repo_id = create_repo(&app, &token, "100", "widget").await;

    app.state
        .scan_result_repository
        .insert(&ScanResultCreate {
            repository_id: repo_id.clone(),
            scan_type: ScanType::Security,
            title: "finding".to_string(),
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
        })
        .await
        .unwrap();

    let response = app
        .request(
            Method::DELETE,
            &format!("/repositories/{repo_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let remaining = app
        .state
        .scan_result_repository
        .list_for_user(&user_id)
        .await
        .unwrap();
    assert!(remaining.is_empty(), "scan results should cascade on delete");
}

#[tokio::test]
async fn test_lookup_by_external_identity() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice@example.com", "pw").await;
    let repo_id = create_repo(&app, &token, "100", "widget").await;

    let found = app
        .state
        .repository_service
        .get_repository_by_external_id(&user_id, "100", "github")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, repo_id);

    // Same external id under another provider is a different identity.
    assert!(app
        .state
        .repository_service
        .get_repository_by_external_id(&user_id, "100", "bitbucket")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_provider_account_round_trip() {
    let app = create_test_app().await;
    let (user_id, _token) = app.register_user("alice@example.com", "pw").await;

    let account = app
        .state
        .user_repository
        .create_provider_account(
            &user_id,
            &ProviderAccountCreate {
                provider: "github".to_string(),
                provider_account_id: "gh-123".to_string(),
                access_token: Some("token".to_string()),
                refresh_token: None,
                scope: Some("repo".to_string()),
                expires_at: None,
            },
        )
        .await
        .unwrap();

    let accounts = app
        .state
        .user_repository
        .list_provider_accounts(&user_id)
        .await
        .unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, account.id);
    assert_eq!(accounts[0].provider_account_id, "gh-123");
}

#[tokio::test]
async fn test_repositories_require_auth() {
    let app = create_test_app().await;

    let response = app.request(Method::GET, "/repositories", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/repositories",
            None,
            Some(repo_payload("1", "x")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
