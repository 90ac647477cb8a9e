//! Test utilities for CLI testing
//!
//! Provides an in-process mock of the Robot failover endpoints and a
//! recording [`FailoverApi`] implementation.

use crate::client::FailoverApi;
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Form, Router,
};
use failover_core::api::{ApiErrorBody, FailoverEnvelope};
use failover_core::{duty::same_address, FailoverError, FailoverRecord};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Records served by default
pub fn sample_records() -> Vec<FailoverRecord> {
    vec![
        FailoverRecord::new(
            "198.51.100.5",
            "255.255.255.0",
            "203.0.113.9",
            "203.0.113.1",
            12345,
        ),
        FailoverRecord::new(
            "198.51.100.6",
            "255.255.255.255",
            "203.0.113.1",
            "203.0.113.9",
            67890,
        ),
    ]
}

/// A request seen by the mock server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub active_server_ip: Option<String>,
}

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    /// Failover records, mutated by updates
    pub records: Arc<Mutex<Vec<FailoverRecord>>>,
    /// Every request received, in order
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Expected `Authorization` header value
    authorization: String,
    /// Serve records without the `{"failover": ...}` wrapper
    bare: bool,
}

impl MockServerState {
    /// Snapshot of the recorded requests
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: &str, path: String, active_server_ip: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path,
            active_server_ip,
        });
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == self.authorization)
    }

    fn envelope(&self, record: FailoverRecord) -> FailoverEnvelope {
        if self.bare {
            FailoverEnvelope::Bare(record)
        } else {
            FailoverEnvelope::wrap(record)
        }
    }
}

/// Compute the basic-auth header reqwest sends for these credentials.
fn basic_auth_header(login: &str, password: &str) -> String {
    reqwest::Client::new()
        .get("http://localhost/")
        .basic_auth(login, Some(password))
        .build()
        .ok()
        .and_then(|req| {
            req.headers()
                .get(reqwest::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok().map(str::to_string))
        })
        .unwrap_or_default()
}

/// Form body of an update request
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    active_server_ip: String,
}

/// Mock Robot server
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a mock server accepting login `a`, password `b`
    pub fn new() -> Self {
        Self {
            state: MockServerState {
                records: Arc::new(Mutex::new(sample_records())),
                requests: Arc::new(Mutex::new(Vec::new())),
                authorization: basic_auth_header("a", "b"),
                bare: false,
            },
            port: 0, // Will be assigned when server starts
        }
    }

    /// Replace the served records
    pub fn with_records(self, records: Vec<FailoverRecord>) -> Self {
        *self.state.records.lock().unwrap() = records;
        self
    }

    /// Accept different credentials
    pub fn with_credentials(mut self, login: &str, password: &str) -> Self {
        self.state.authorization = basic_auth_header(login, password);
        self
    }

    /// Serve records without the wrapper object
    pub fn with_bare_records(mut self) -> Self {
        self.state.bare = true;
        self
    }

    /// Start the mock server and return the base URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route("/failover", get(list_handler))
            .route("/failover/:ip", get(get_handler).post(update_handler))
            .with_state(self.state.clone())
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ApiErrorBody::new(status.as_u16(), code, message)),
    )
        .into_response()
}

fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized")
}

fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "FAILOVER_NOT_FOUND",
        "Failover not found",
    )
}

async fn list_handler(State(state): State<MockServerState>, headers: HeaderMap) -> Response {
    state.record("GET", "/failover".to_string(), None);
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let records = state.records.lock().unwrap().clone();
    let body: Vec<FailoverEnvelope> = records.into_iter().map(|r| state.envelope(r)).collect();
    Json(body).into_response()
}

async fn get_handler(
    Path(ip): Path<String>,
    State(state): State<MockServerState>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", format!("/failover/{}", ip), None);
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let found = state
        .records
        .lock()
        .unwrap()
        .iter()
        .find(|r| same_address(&r.address, &ip))
        .cloned();

    match found {
        Some(record) => Json(state.envelope(record)).into_response(),
        None => not_found(),
    }
}

async fn update_handler(
    Path(ip): Path<String>,
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Form(form): Form<UpdateForm>,
) -> Response {
    state.record(
        "POST",
        format!("/failover/{}", ip),
        Some(form.active_server_ip.clone()),
    );
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let updated = {
        let mut records = state.records.lock().unwrap();
        records
            .iter_mut()
            .find(|r| same_address(&r.address, &ip))
            .map(|r| {
                r.active_server_address = form.active_server_ip.clone();
                r.clone()
            })
    };

    match updated {
        Some(record) => Json(state.envelope(record)).into_response(),
        None => not_found(),
    }
}

/// How a [`SpyApi`] fails every call
#[derive(Debug, Clone, Copy)]
pub enum SpyFailure {
    /// Answer with an API error carrying this HTTP status
    Status(u16),
    /// Behave as if the service was unreachable
    Transport,
}

/// Recording [`FailoverApi`] that never touches the network
#[derive(Debug, Clone, Default)]
pub struct SpyApi {
    /// One entry per call, e.g. `get 198.51.100.5`
    pub calls: Arc<Mutex<Vec<String>>>,
    records: Arc<Mutex<Vec<FailoverRecord>>>,
    failure: Option<SpyFailure>,
}

impl SpyApi {
    /// Spy serving [`sample_records`]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(sample_records())),
            ..Self::default()
        }
    }

    /// Fail every call
    pub fn failing(mut self, failure: SpyFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Snapshot of the recorded calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: String) -> failover_core::Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure {
            None => Ok(()),
            Some(SpyFailure::Status(status)) => Err(FailoverError::Api {
                status,
                code: None,
                message: "spy failure".to_string(),
            }),
            Some(SpyFailure::Transport) => {
                Err(FailoverError::Transport("spy unreachable".to_string()))
            }
        }
    }

    fn missing(address: &str) -> FailoverError {
        FailoverError::Api {
            status: 404,
            code: Some("FAILOVER_NOT_FOUND".to_string()),
            message: format!("no failover {}", address),
        }
    }
}

#[async_trait]
impl FailoverApi for SpyApi {
    async fn list_failovers(&self) -> failover_core::Result<Vec<FailoverRecord>> {
        self.enter("list".to_string())?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get_failover(&self, address: &str) -> failover_core::Result<FailoverRecord> {
        self.enter(format!("get {}", address))?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| same_address(&r.address, address))
            .cloned()
            .ok_or_else(|| Self::missing(address))
    }

    async fn update_failover(
        &self,
        address: &str,
        active_server: &str,
    ) -> failover_core::Result<FailoverRecord> {
        self.enter(format!("update {} {}", address, active_server))?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| same_address(&r.address, address))
            .ok_or_else(|| Self::missing(address))?;
        record.active_server_address = active_server.to_string();
        Ok(record.clone())
    }
}
