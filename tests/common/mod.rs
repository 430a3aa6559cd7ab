#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use formdesk::auth::jwt::Claims;
use formdesk::config::{AuthConfig, AuthMode, Config, FormsConfig};
use formdesk::state::SharedState;
use formdesk::store::{MemoryStatusStore, StatusStore, StoreError};

pub const ADMIN_KEY: &str = "test-admin-key";
pub const API_TOKEN: &str = "test-forms-token";
pub const SITE_ID: &str = "site-123";
pub const IDENTITY_SECRET: &str = "test-identity-secret-that-is-long-enough";

/// Status store that counts traffic and can be told to fail reads or writes.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStatusStore,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store offline".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(
                "connection to postgres://db.internal refused".to_string(),
            ));
        }
        self.inner.set(key, value).await
    }
}

/// What the fake forms API answers with.
#[derive(Clone)]
pub struct FormsFixture {
    pub forms: Value,
    pub submissions: Value,
    /// When set, every request fails with this status and body.
    pub failure: Option<(u16, String)>,
}

impl FormsFixture {
    pub fn with_submissions(submissions: Value) -> Self {
        Self {
            forms: json!([
                { "id": "form-newsletter", "name": "newsletter" },
                { "id": "form-contact", "name": "contact" },
            ]),
            submissions,
            failure: None,
        }
    }
}

struct FakeForms {
    fixture: FormsFixture,
    hits: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {API_TOKEN}"))
}

async fn fake_list_forms(
    State(fake): State<Arc<FakeForms>>,
    Path(site_id): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    if let Some((status, body)) = &fake.fixture.failure {
        return (AxumStatus::from_u16(*status).unwrap(), body.clone()).into_response();
    }
    if !authorized(&headers) {
        return (AxumStatus::UNAUTHORIZED, "bad token").into_response();
    }
    if site_id != SITE_ID {
        return (AxumStatus::NOT_FOUND, "no such site").into_response();
    }
    Json(fake.fixture.forms.clone()).into_response()
}

async fn fake_list_submissions(
    State(fake): State<Arc<FakeForms>>,
    Path(form_id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> axum::response::Response {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_query.lock().unwrap() = query;
    if !authorized(&headers) {
        return (AxumStatus::UNAUTHORIZED, "bad token").into_response();
    }
    if form_id != "form-contact" {
        return (AxumStatus::NOT_FOUND, "no such form").into_response();
    }
    Json(fake.fixture.submissions.clone()).into_response()
}

/// A running test server plus its fake upstream.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<CountingStore>,
    pub state: SharedState,
    fake: Arc<FakeForms>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn upstream_hits(&self) -> usize {
        self.fake.hits.load(Ordering::SeqCst)
    }

    pub fn last_submissions_query(&self) -> Option<String> {
        self.fake.last_query.lock().unwrap().clone()
    }

    /// GET /listSubmissions with an optional admin key.
    pub async fn list(&self, key: Option<&str>) -> (Value, StatusCode) {
        let mut req = self.client.get(self.url("/listSubmissions"));
        if let Some(key) = key {
            req = req.header("x-admin-key", key);
        }
        let resp = req.send().await.expect("list request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST /updateStatus with an optional admin key.
    pub async fn update(&self, key: Option<&str>, body: &Value) -> (Value, StatusCode) {
        let mut req = self.client.post(self.url("/updateStatus")).json(body);
        if let Some(key) = key {
            req = req.header("x-admin-key", key);
        }
        let resp = req.send().await.expect("update request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Sign in through the dashboard form and return the session cookie.
    pub async fn sign_in(&self, credential: &str) -> String {
        let resp = self
            .client
            .post(self.url("/admin/login"))
            .form(&[("credential", credential)])
            .send()
            .await
            .expect("login request failed");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login did not redirect");
        let set_cookie = resp
            .headers()
            .get("set-cookie")
            .expect("no session cookie")
            .to_str()
            .unwrap()
            .to_string();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub fn test_config(forms_base: &str) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "warn".to_string(),
        database_url: None,
        forms: FormsConfig {
            api_base: forms_base.to_string(),
            site_id: Some(SITE_ID.to_string()),
            api_token: Some(API_TOKEN.to_string()),
            form_name: "contact".to_string(),
        },
        auth: AuthConfig {
            mode: AuthMode::SharedSecret,
            admin_key: Some(ADMIN_KEY.to_string()),
            identity_secret: Some(IDENTITY_SECRET.to_string()),
        },
    }
}

pub async fn spawn_app(fixture: FormsFixture) -> TestApp {
    spawn_app_with(fixture, |_| {}).await
}

/// Spawn the fake forms API and the app, letting the caller adjust the config.
pub async fn spawn_app_with(fixture: FormsFixture, tweak: impl FnOnce(&mut Config)) -> TestApp {
    let fake = Arc::new(FakeForms {
        fixture,
        hits: AtomicUsize::new(0),
        last_query: Mutex::new(None),
    });

    let upstream = Router::new()
        .route("/api/v1/sites/{site_id}/forms", get(fake_list_forms))
        .route("/api/v1/forms/{form_id}/submissions", get(fake_list_submissions))
        .with_state(fake.clone());

    let upstream_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake forms API");
    let upstream_addr = upstream_listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(upstream_listener, upstream)
            .await
            .expect("Fake forms API failed");
    });

    let mut config = test_config(&format!("http://{upstream_addr}/api/v1"));
    tweak(&mut config);

    let store = Arc::new(CountingStore::default());
    let (app, state) =
        formdesk::build_app(config, store.clone()).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        store,
        state,
        fake,
    }
}

/// The two-submission scenario: `a` older than `b`.
pub fn two_submissions() -> Value {
    json!([
        {
            "id": "a",
            "created_at": "2024-01-01T00:00:00Z",
            "data": { "name": "Alice Kim", "email": "alice@example.com", "message": "Need a quote" }
        },
        {
            "id": "b",
            "created_at": "2024-02-01T00:00:00Z",
            "data": { "name": "Bob Lee", "email": "bob@example.com", "message": "Website is down" }
        }
    ])
}

/// Sign an identity token the way the identity provider would.
pub fn mint_token(sub: &str, email: Option<&str>, ttl: Duration, secret: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        email: email.map(str::to_string),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}
