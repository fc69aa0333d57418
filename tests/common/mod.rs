#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use daylog_api::auth::{AuthError, IdentityResolver};
use daylog_api::config::ListConfig;
use daylog_api::database::{self, EntryStore};
use daylog_api::{app, AppState};

/// Token -> user id mapping standing in for the external identity service.
pub struct FakeResolver {
    users: HashMap<String, String>,
}

impl FakeResolver {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            users: pairs
                .iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityResolver for FakeResolver {
    async fn resolve(&self, token: &str) -> Result<String, AuthError> {
        self.users
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

async fn test_store() -> EntryStore {
    // single connection so the in-memory database is shared across requests
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    database::init_schema(&pool).await.expect("schema init");
    EntryStore::new(
        pool,
        ListConfig {
            default_limit: 365,
            max_limit: 1000,
        },
    )
}

/// Router with identity implicit (single global tenant). Also returns the
/// store handle so tests can seed rows directly.
pub async fn single_tenant_app() -> (Router, EntryStore) {
    let store = test_store().await;
    let router = app(AppState {
        store: store.clone(),
        identity: None,
    });
    (router, store)
}

/// Router where every entry operation requires a bearer token. Tokens
/// `token-a` / `token-b` resolve to `user-a` / `user-b`.
pub async fn multi_tenant_app() -> (Router, EntryStore) {
    let store = test_store().await;
    let resolver = FakeResolver::new(&[("token-a", "user-a"), ("token-b", "user-b")]);
    let router = app(AppState {
        store: store.clone(),
        identity: Some(Arc::new(resolver)),
    });
    (router, store)
}

/// Issue a request with a raw (possibly invalid) body, returning status and
/// parsed response body.
pub async fn send_raw(
    router: &Router,
    method: &str,
    path: &str,
    content_type: &str,
    body: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Issue one request against the router, returning status and parsed body.
pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}
