#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tasklane::{
    api::{build_router, AppState},
    auth::issuer::ISSUER_KEY_HEADER,
    auth::{SessionIdentity, SessionRecord, SessionService},
    config::SessionConfig,
    storage::{MemorySessionStore, SessionStore},
    Error, Result,
};
use tower::ServiceExt;
use uuid::Uuid;

pub fn identity() -> SessionIdentity {
    SessionIdentity {
        user_id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        name: "Ada Lovelace".to_string(),
    }
}

/// Memory store that counts every call it forwards
#[derive(Default)]
pub struct CountingStore {
    inner: MemorySessionStore,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub deletes: AtomicUsize,
    pub index_writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.puts.load(Ordering::SeqCst) + self.deletes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Plant a record directly, bypassing the session service
    pub async fn plant(&self, key: &str, record: &SessionRecord) {
        let payload = serde_json::to_string(record).unwrap();
        self.inner.put(key, payload, Duration::from_secs(3600)).await.unwrap();
    }

    pub async fn raw_get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap()
    }
}

#[async_trait]
impl SessionStore for CountingStore {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    async fn add_member(&self, key: &str, member: &str, ttl: Duration) -> Result<()> {
        self.index_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.add_member(key, member, ttl).await
    }

    async fn remove_member(&self, key: &str, member: &str) -> Result<()> {
        self.index_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_member(key, member).await
    }

    async fn members(&self, key: &str) -> Result<Vec<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.members(key).await
    }
}

/// Store whose backend is always down
pub struct UnreachableStore;

#[async_trait]
impl SessionStore for UnreachableStore {
    fn backend(&self) -> &'static str {
        "unreachable"
    }

    async fn put(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
        Err(Error::storage("connection refused"))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::storage("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Error::storage("connection refused"))
    }

    async fn add_member(&self, _key: &str, _member: &str, _ttl: Duration) -> Result<()> {
        Err(Error::storage("connection refused"))
    }

    async fn remove_member(&self, _key: &str, _member: &str) -> Result<()> {
        Err(Error::storage("connection refused"))
    }

    async fn members(&self, _key: &str) -> Result<Vec<String>> {
        Err(Error::storage("connection refused"))
    }
}

pub fn counting_service() -> (SessionService, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    (SessionService::new(store.clone()), store)
}

/// A well-formed token that was never issued
pub fn unknown_token() -> String {
    "0123456789abcdef".repeat(4)
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct TestApp {
    pub sessions: SessionService,
    pub store: Arc<CountingStore>,
    router: Router,
}

pub fn test_session_config() -> SessionConfig {
    SessionConfig { cookie_secure: false, ..Default::default() }
}

pub fn setup_test_app() -> TestApp {
    let (sessions, store) = counting_service();
    let router = build_router(AppState::new(sessions.clone(), test_session_config()));
    TestApp { sessions, store, router }
}

/// Issuer key the identity proxy presents in tests
pub const ISSUER_KEY: &str = "test-issuer-key-0123456789abcdef0123";

/// App with the issuing endpoint mounted
pub fn setup_issuing_app() -> TestApp {
    let (sessions, store) = counting_service();
    let config = SessionConfig { issuer_secret: Some(ISSUER_KEY.to_string()), ..test_session_config() };
    let router = build_router(AppState::new(sessions.clone(), config));
    TestApp { sessions, store, router }
}

pub fn setup_unreachable_app() -> Router {
    let sessions = SessionService::new(Arc::new(UnreachableStore));
    build_router(AppState::new(sessions, test_session_config()))
}

pub enum Credential<'a> {
    None,
    Bearer(&'a str),
    Cookie(&'a str),
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

pub async fn send_request(
    router: Router,
    method: Method,
    path: &str,
    credential: Credential<'_>,
) -> TestResponse {
    send(router, method, path, credential, None, None).await
}

/// Send a JSON body, optionally presenting the issuer key
pub async fn send_json(
    router: Router,
    method: Method,
    path: &str,
    credential: Credential<'_>,
    issuer_key: Option<&str>,
    body: Value,
) -> TestResponse {
    send(router, method, path, credential, issuer_key, Some(body)).await
}

async fn send(
    router: Router,
    method: Method,
    path: &str,
    credential: Credential<'_>,
    issuer_key: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(key) = issuer_key {
        builder = builder.header(ISSUER_KEY_HEADER, key);
    }
    builder = match credential {
        Credential::None => builder,
        Credential::Bearer(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
        Credential::Cookie(token) => {
            builder.header(COOKIE, format!("{}={}", test_session_config().cookie_name, token))
        }
    };

    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse { status, headers, body }
}
