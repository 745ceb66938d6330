//! In-process fixture for the operational HTTP API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use copelk_core::Config;
use copelk_server::api::create_router;
use copelk_server::state::AppState;

/// Router built from a config, driven with `oneshot`.
pub struct TestFixture {
    pub router: Router,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
}

impl TestResponse {
    /// Body parsed as JSON, or `Null` when it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

impl TestFixture {
    /// Fixture with default settings and a placeholder token.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.telegram.token = "123456:test-token".to_string();
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let state = Arc::new(AppState::new(config));
        Self {
            router: create_router(state),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            content_type,
            text: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }
}
