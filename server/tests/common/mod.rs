pub mod scenarios;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server::auth::session_service::SessionService;
use server::configs::http::HttpConfig;
use server::configs::server::ServerConfig;
use server::http::http_server;
use server::http::shared::AppState;
use server::storage::memory::InMemoryRepository;
use server::utils::clock::ManualClock;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub config: ServerConfig,
}

impl TestApp {
    pub async fn start() -> Self {
        let mut config = ServerConfig::default();
        config.jwt.secret = "integration-test-secret".to_string();
        config.password.hashing_cost = 4;
        config.admin.default_password = ADMIN_PASSWORD.to_string();

        let clock = Arc::new(ManualClock::starting_now());
        let session_service = SessionService::from_config(
            &config,
            Arc::new(InMemoryRepository::new()),
            clock.clone(),
        )
        .expect("Failed to create session service");
        session_service
            .ensure_admin_exists()
            .await
            .expect("Failed to create the default admin");

        let router = http_server::build_router(
            &HttpConfig::default(),
            Arc::new(AppState::new(session_service)),
        )
        .expect("Failed to build router");

        Self {
            router,
            clock,
            config,
        }
    }

    pub fn admin_email(&self) -> String {
        self.config.admin.email.to_lowercase()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }
}
