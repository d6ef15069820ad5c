use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use tower::ServiceExt;

use quotation_server::{
    app::{AppState, build_router},
    config::Config,
    db,
};

pub const BOUNDARY: &str = "X-BOUNDARY";

/// A fully wired server over an in-memory database and a throwaway
/// upload directory, plus direct store access for assertions.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        db::setup_database(&pool).await.expect("schema");

        let upload_dir =
            std::env::temp_dir().join(format!("quotation-tests-{}", uuid::Uuid::new_v4()));
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            session_timeout_secs: 3600,
            max_pool_size: 1,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
        };

        let state = AppState::new(pool, &config).expect("app state");
        state
            .admins
            .ensure_default_admin(&config.admin_username, &config.admin_password)
            .await
            .expect("default admin");

        Self {
            app: build_router(state.clone()),
            state,
            upload_dir,
        }
    }

    /// Log in as the seeded admin and return the bearer token.
    pub async fn login(&self) -> String {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/admin/login",
                None,
                &json!({ "username": "admin", "password": "admin123" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Run one request through the router and decode the JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.upload_dir).ok();
    }
}

// Helper to build a bodyless request, optionally authenticated
pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

// Helper to build a JSON request, optionally authenticated
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Hand-built multipart body for the public submission form.
pub struct SubmissionForm {
    body: Vec<u8>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// A submission that passes every gateway rule, with no plan file.
    pub fn valid() -> Self {
        Self::new()
            .text("projectType", "renovation")
            .text("budget", "500000")
            .text("hasPlans", "no")
            .text("fullName", "A B")
            .text("email", "a@b.com")
            .text("phone", "9876543210")
            .text("city", "Pune")
            .text("consultation", "true")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend(bytes);
        self.body.extend(b"\r\n");
        self
    }

    pub fn build(mut self) -> Request<Body> {
        self.body.extend(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/api/quotations")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
