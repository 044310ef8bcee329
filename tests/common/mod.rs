#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

use tableronde_api::auth::jwt;
use tableronde_api::config::{Config, Environment, RateLimitPolicy};
use tableronde_api::mail::{Mailer, SignInEmail};
use tableronde_api::rate_limit::InMemoryRateLimiter;
use tableronde_api::services::UserService;
use tableronde_api::state::AppState;

/// Mailer that keeps every sign-in email in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SignInEmail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SignInEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_sign_in(&self, email: &SignInEmail) -> anyhow::Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Config,
    pub mailer: RecordingMailer,
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_access_expiration_secs: 900,
        app_url: "http://localhost:3001".to_string(),
        email_from: "TableRonde <noreply@tableronde.local>".to_string(),
        resend_api_key: None,
        signin_token_ttl_secs: 600,
        signin_rate_limit: RateLimitPolicy {
            limit: 3,
            window: Duration::from_secs(600),
        },
        message_rate_limit: RateLimitPolicy {
            limit: 5,
            window: Duration::from_secs(60),
        },
    }
}

/// Fresh app over a migrated in-memory SQLite database.
///
/// The pool holds a single connection: every extra connection would open its own
/// empty in-memory database.
pub async fn test_app() -> TestApp {
    let config = test_config();

    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap_or_default();
    tableronde_api::db::migrate(&db).await.unwrap_or_default();

    let mailer = RecordingMailer::default();
    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        mailer: Arc::new(mailer.clone()),
        rate_limiter: Arc::new(InMemoryRateLimiter::new()),
    };

    TestApp {
        router: tableronde_api::routes::router().with_state(state),
        db,
        config,
        mailer,
    }
}

impl TestApp {
    /// Create a verified user directly and return an access token for it.
    pub async fn sign_in_as(&self, email: &str) -> String {
        let user_id = UserService::find_or_create_by_email(&self.db, email)
            .await
            .map(|user| user.id)
            .unwrap_or_default();
        jwt::generate_access_token(user_id, &self.config).unwrap_or_default()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send("PUT", uri, token, Some(body)).await
    }

    /// Send a request with a raw (possibly malformed) JSON body.
    pub async fn post_raw(&self, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap_or_default();
        call(&self.router, request).await
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap_or_default(),
            None => builder.body(Body::empty()).unwrap_or_default(),
        };
        call(&self.router, request).await
    }

    /// Create a session through the API and return its summary.
    pub async fn create_session(&self, token: &str, overrides: &Value) -> Value {
        let mut body = session_body();
        if let (Some(body), Some(overrides)) = (body.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                body.insert(key.clone(), value.clone());
            }
        }
        let (status, summary) = self.post("/api/sessions", Some(token), &body).await;
        assert_eq!(status, StatusCode::OK, "session creation failed: {summary}");
        summary
    }
}

/// A valid session creation body.
pub fn session_body() -> Value {
    json!({
        "title": "Soirée Catan",
        "description": "On apprend les règles ensemble",
        "games": ["Catan"],
        "addressApprox": "Lyon 7e, près de Jean Macé",
        "latitude": 45.7456,
        "longitude": 4.8421,
        "startsAt": "2026-11-20T18:00:00.000Z",
        "endsAt": "2026-11-20T22:00:00.000Z",
        "capacity": 4
    })
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}
