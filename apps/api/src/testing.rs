//! Test fixtures: static auth provider, in-memory store, router driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::auth::AuthProvider;
use crate::backend::BackendError;
use crate::config::Config;
use crate::models::user::AuthUser;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const TOKEN: &str = "test-access-token";

pub fn recruiter() -> AuthUser {
    AuthUser {
        id: Uuid::from_u128(0x0d9e_8f7a_6b5c_4d3e_8f2a_1b0c_9d8e_7f6a),
        email: Some("recruiter@careerweek.com".to_string()),
    }
}

/// Accepts exactly one token until it is signed out.
#[derive(Default)]
pub struct StaticAuth {
    revoked: AtomicBool,
    links: Mutex<Vec<(String, String)>>,
}

impl StaticAuth {
    pub fn sent_links(&self) -> Vec<(String, String)> {
        self.links.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        self.links
            .lock()
            .unwrap()
            .push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }

    async fn user_for_token(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        if access_token == TOKEN && !self.revoked.load(Ordering::SeqCst) {
            Ok(recruiter())
        } else {
            Err(BackendError::Unauthorized)
        }
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), BackendError> {
        self.revoked.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        backend_url: "http://backend.invalid".to_string(),
        backend_anon_key: "anon".to_string(),
        site_url: "http://localhost:5173".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<StaticAuth>,
    pub state: AppState,
}

pub fn test_context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(StaticAuth::default());
    let state = AppState {
        store: store.clone(),
        auth: auth.clone(),
        config: test_config(),
    };
    TestContext { store, auth, state }
}

/// Runs one request through the full router and decodes the JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
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

    let response = build_router(ctx.state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
