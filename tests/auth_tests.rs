use axum::http::{Method, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use mandates_backend::models::ProfileUpdate;
use mandates_backend::repositories::UserRepository;

mod common;
use common::{create_test_app, json_body};

#[tokio::test]
async fn test_register_returns_user_and_token() {
    let app = create_test_app().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "alice@example.com", "password": "s3cret" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().unwrap().len() > 20);
    // The password hash must never leave the service.
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_creates_exactly_one_profile_row() {
    let app = create_test_app().await;
    let (user_id, _token) = app.register_user("bob@example.com", "pw").await;

    let profile = app
        .state
        .user_repository
        .find_profile(&user_id)
        .await
        .unwrap()
        .expect("profile row should exist");

    assert_eq!(profile.user_id, user_id);
}

#[tokio::test]
async fn test_duplicate_registration_fails_with_400() {
    let app = create_test_app().await;
    app.register_user("carol@example.com", "first").await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "carol@example.com", "password": "second" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = create_test_app().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "pw" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = create_test_app().await;
    app.register_user("dave@example.com", "hunter2").await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "dave@example.com", "password": "hunter2" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "dave@example.com");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = create_test_app().await;
    app.register_user("erin@example.com", "correct").await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "erin@example.com", "password": "wrong" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    let app = create_test_app().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_resolves_token_to_its_own_user() {
    let app = create_test_app().await;
    let (alice_id, alice_token) = app.register_user("alice@example.com", "pw").await;
    let (bob_id, bob_token) = app.register_user("bob@example.com", "pw").await;

    let response = app
        .request(Method::GET, "/auth/me", Some(&alice_token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], alice_id.as_str());

    let response = app
        .request(Method::GET, "/auth/me", Some(&bob_token), None)
        .await;
    let body = json_body(response).await;
    assert_eq!(body["id"], bob_id.as_str());
    assert_ne!(alice_id, bob_id);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = create_test_app().await;

    let response = app.request(Method::GET, "/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let app = create_test_app().await;
    let (_id, token) = app.register_user("frank@example.com", "pw").await;

    let mut tampered = token.into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = app
        .request(Method::GET, "/auth/me", Some(&tampered), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = create_test_app().await;
    let (user_id, _token) = app.register_user("grace@example.com", "pw").await;

    // Forge a structurally valid token whose expiry is in the past.
    let now = Utc::now().timestamp();
    let claims = json!({ "sub": user_id, "iat": now - 7200, "exp": now - 3600 });
    let expired = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(app.state.config.auth_secret.as_bytes()),
    )
    .unwrap();

    let response = app
        .request(Method::GET, "/auth/me", Some(&expired), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update_round_trip() {
    let app = create_test_app().await;
    let (user_id, _token) = app.register_user("ivan@example.com", "pw").await;

    let updated = app
        .state
        .auth_service
        .update_profile(
            &user_id,
            &ProfileUpdate {
                username: Some("ivan".to_string()),
                full_name: Some("Ivan Petrov".to_string()),
                avatar_url: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username.as_deref(), Some("ivan"));

    let fetched = app
        .state
        .auth_service
        .get_profile(&user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.full_name.as_deref(), Some("Ivan Petrov"));

    // No profile to update for an unknown user.
    let missing = app
        .state
        .auth_service
        .update_profile("no-such-user", &ProfileUpdate::default())
        .await;
    assert!(missing.is_err());

    let by_email = app
        .state
        .auth_service
        .get_user_by_email("ivan@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user_id);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let app = create_test_app().await;
    let (user_id, _token) = app.register_user("heidi@example.com", "pw").await;

    let now = Utc::now().timestamp();
    let claims = json!({ "sub": user_id, "iat": now, "exp": now + 3600 });
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let response = app
        .request(Method::GET, "/auth/me", Some(&forged), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
