//! In-process stand-in for the lab backend, bound to an ephemeral loopback
//! port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use laboissim::config::Config;
use laboissim::state::AppState;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Default)]
pub struct MockState {
    pub publications: Vec<Value>,
    /// When set, `GET /api/publications/` answers with this status.
    pub publications_status: Option<u16>,
    pub files: Vec<Value>,
    pub members: Vec<Value>,
    pub site_content: Option<Value>,
    pub site_content_status: Option<u16>,
    /// Token pair handed out by `/auth/google/jwt/`; `None` means 401.
    pub exchange: Option<Value>,
    /// Profiles served by `/api/user/`, keyed by access token.
    pub users: HashMap<String, Value>,
    pub seen: Vec<Seen>,
}

#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<MockState>>,
}

type Shared = Arc<Mutex<MockState>>;

fn record(state: &Shared, method: &str, path: String, headers: &HeaderMap, body: &[u8]) {
    let header_text = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.lock().unwrap().seen.push(Seen {
        method: method.to_string(),
        path,
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: body.to_vec(),
    });
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET", "/api/user/".into(), &headers, &[]);
    let user = bearer(&headers).and_then(|t| state.lock().unwrap().users.get(&t).cloned());
    match user {
        Some(user) => Json(user).into_response(),
        None => (StatusCode::UNAUTHORIZED, "invalid token").into_response(),
    }
}

async fn exchange_get(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET", "/auth/google/jwt/".into(), &headers, &[]);
    match state.lock().unwrap().exchange.clone() {
        Some(tokens) => Json(tokens).into_response(),
        None => (StatusCode::UNAUTHORIZED, "no oauth session").into_response(),
    }
}

async fn exchange_post(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    record(&state, "POST", "/auth/google/jwt/".into(), &headers, &body);
    let email = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v["email"].as_str().map(str::to_string));
    match (email, state.lock().unwrap().exchange.clone()) {
        (Some(_), Some(tokens)) => Json(tokens).into_response(),
        _ => (StatusCode::BAD_REQUEST, "email required").into_response(),
    }
}

async fn list_publications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET", "/api/publications/".into(), &headers, &[]);
    let guard = state.lock().unwrap();
    match guard.publications_status {
        Some(code) => (status(code), "server exploded").into_response(),
        None => Json(json!(guard.publications)).into_response(),
    }
}

async fn delete_publication(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    record(&state, "DELETE", format!("/api/publications/{}/", id), &headers, &[]);
    let mut guard = state.lock().unwrap();
    let before = guard.publications.len();
    guard.publications.retain(|p| p["id"].to_string() != id);
    if guard.publications.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn search_members(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default().to_lowercase();
    record(
        &state,
        "GET",
        format!("/api/publications/search_members/?q={}", q),
        &headers,
        &[],
    );
    let members: Vec<Value> = state
        .lock()
        .unwrap()
        .members
        .iter()
        .filter(|m| {
            m["name"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&q)
        })
        .cloned()
        .collect();
    Json(json!(members))
}

async fn list_files(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    record(&state, "GET", "/api/files/".into(), &headers, &[]);
    Json(json!(state.lock().unwrap().files))
}

async fn get_site_content(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET", "/api/site-content/".into(), &headers, &[]);
    let guard = state.lock().unwrap();
    if let Some(code) = guard.site_content_status {
        return (status(code), "unavailable").into_response();
    }
    Json(guard.site_content.clone().unwrap_or_else(|| json!({}))).into_response()
}

async fn put_site_content(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    record(&state, "PUT", "/api/site-content/".into(), &headers, &body);
    let guard = state.lock().unwrap();
    if let Some(code) = guard.site_content_status {
        return (status(code), "unavailable").into_response();
    }
    Json(guard.site_content.clone().unwrap_or_else(|| json!({}))).into_response()
}

impl MockBackend {
    pub async fn start(initial: MockState) -> Self {
        let state: Shared = Arc::new(Mutex::new(initial));
        let app = Router::new()
            .route("/api/user/", get(current_user))
            .route("/auth/google/jwt/", get(exchange_get).post(exchange_post))
            .route("/api/publications/", get(list_publications))
            .route("/api/publications/{id}/", delete(delete_publication))
            .route("/api/publications/search_members/", get(search_members))
            .route("/api/files/", get(list_files))
            .route(
                "/api/site-content/",
                get(get_site_content).put(put_site_content),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.lock().unwrap().seen.clone()
    }

    pub fn seen_path(&self, method: &str, path: &str) -> Vec<Seen> {
        self.seen()
            .into_iter()
            .filter(|s| s.method == method && s.path == path)
            .collect()
    }
}

/// Client state wired to `base_url`, with storage in a fresh temp dir.
pub fn app_state(base_url: &str) -> (TempDir, AppState) {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.storage.path = Some(tmp.path().join("local_storage.db"));
    let state = AppState::build(config).unwrap();
    (tmp, state)
}

/// An address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";
