#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use ahiska_api::auth::{Identity, Role};
use ahiska_api::config::AppConfig;
use ahiska_api::database::manager;
use ahiska_api::AppState;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ahiska-api"));
        cmd.arg("serve")
            .arg("--port")
            .arg(port.to_string())
            .env("APP_ENV", "test")
            .env("DATABASE_CONNECTION_TIMEOUT", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK || resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Test configuration whose pool never connects unless a query runs.
pub fn offline_state() -> AppState {
    let mut config = AppConfig::test();
    config.database.url = "postgres://localhost:1/ahiska_test".to_string();
    config.database.connection_timeout = 1;

    let pool = manager::connect_lazy(&config.database).expect("lazy pool");
    AppState::new(config, pool).expect("state")
}

/// Connected state with the schema applied, or `None` when TEST_DATABASE_URL is unset.
pub async fn database_state() -> Option<AppState> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;

    let mut config = AppConfig::test();
    config.database.url = url;

    let pool = manager::connect(&config.database).await.expect("connect to TEST_DATABASE_URL");
    manager::init_schema(&pool).await.expect("apply schema");
    Some(AppState::new(config, pool).expect("state"))
}

pub fn token_for(state: &AppState, id: i32, role: Role) -> String {
    let identity = Identity {
        id,
        email: format!("user{}@example.com", id),
        role,
    };
    state.keys.issue(&identity).expect("issue token")
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4())
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}
