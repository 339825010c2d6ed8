use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use mandates_backend::{build_router, config::Settings, database, AppState};

/// A fully wired application over an in-memory database, plus the state for
/// direct repository/service access from tests.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        auth_secret: "test-secret-0123456789".to_string(),
        auth_token_expiry_seconds: 3600,
        cors_allow_origins: vec!["*".to_string()],
        log_level: "error".to_string(),
        log_format: "text".to_string(),
        environment: "test".to_string(),
        scan_delay_min_ms: 0,
        scan_delay_max_ms: 0,
        server_port: 0,
    }
}

pub async fn create_test_app() -> TestApp {
    let settings = test_settings();

    let pool = database::create_connection_pool(&settings.database_url)
        .await
        .expect("Failed to create in-memory database pool");

    let state = AppState::new_with_pool(settings, pool)
        .await
        .expect("Failed to create test app state");

    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register a user and return `(user_id, token)`.
    #[allow(dead_code)]
    pub async fn register_user(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(response.status(), 200, "registration failed for {email}");
        let body = json_body(response).await;
        let user_id = body["user"]["id"].as_str().unwrap().to_string();
        let token = body["access_token"].as_str().unwrap().to_string();
        (user_id, token)
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
