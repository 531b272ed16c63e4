#![allow(dead_code)]

//! Stub backend for integration tests: an axum router on an ephemeral port
//! that answers like the real job-board API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub const PASSWORD: &str = "hunter22";
pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n\x00\x01\x02binary\xff\xfe";

#[derive(Default)]
pub struct BackendState {
    pub hits: AtomicUsize,
    pub last_query: Mutex<HashMap<String, String>>,
    pub last_body: Mutex<Option<Value>>,
    pub last_accept: Mutex<Option<String>>,
    /// When set, page 1 of `/scraping/jobs` waits for `release_page_one`.
    pub hold_page_one: AtomicBool,
    pub page_one_arrived: Notify,
    pub release_page_one: Notify,
}

impl BackendState {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    fn record_body(&self, body: &Value) {
        *self.last_body.lock().unwrap() = Some(body.clone());
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.last_query.lock().unwrap().clone()
    }
}

pub struct Backend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

pub async fn spawn() -> Backend {
    let state = Arc::new(BackendState::default());
    let app = Router::new()
        .route("/users/login", post(login))
        .route("/users/google-code-login", post(google_login))
        .route("/users/register", post(register))
        .route("/users/userfeedback", post(feedback))
        .route("/users/favorite-jobs", post(toggle_favorite))
        .route("/users/:id", get(user_by_id))
        .route("/users/:id/favorite-jobs", get(favorite_jobs))
        .route("/scraping/jobs", get(jobs))
        .route("/scraping/trigger", post(trigger))
        .route("/scraping/states", get(states))
        .route("/scraping/firms", get(firms))
        .route("/scraping/practices", get(practices))
        .route("/resume/upload", post(upload))
        .route("/resume/generate-cover-letter", post(cover_letter))
        .route("/resume/regenerate-cover-letter", post(cover_letter_wrapped))
        .route("/resume/improve-bullet", post(improve_bullet))
        .route("/resume/rewrite", post(rewrite))
        .route("/pdf/export", post(export_pdf))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Backend {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn user_json(id: u64) -> Value {
    json!({"id": id, "email": "student@law.edu", "full_name": "Law Student"})
}

pub fn page_jobs(page: u32, page_size: u32) -> Vec<Value> {
    (0..page_size)
        .map(|i| {
            json!({
                "id": format!("p{page}-{i}"),
                "firm": format!("Firm {i}"),
                "title": "Summer Associate",
                "location": "Atlanta, GA",
                "deadline": "2026-11-01",
                "practice_area": "Litigation"
            })
        })
        .collect()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"message": message}))).into_response()
}

async fn login(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    if body["password"] == PASSWORD {
        Json(json!({"token": "jwt-7", "user": user_json(7), "roles": ["student"]})).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn google_login(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    // older builds answer with `data` instead of `user` and no roles
    Json(json!({"token": "jwt-g", "data": user_json(11)})).into_response()
}

async fn register(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    if body["email"] == "taken@law.edu" {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    (
        StatusCode::CREATED,
        Json(json!({"token": "jwt-new", "user": user_json(12)})),
    )
        .into_response()
}

async fn feedback(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    Json(json!({"message": "Thanks"})).into_response()
}

async fn toggle_favorite(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    StatusCode::OK.into_response()
}

async fn user_by_id(State(s): State<Arc<BackendState>>, Path(id): Path<u64>) -> Response {
    s.hit();
    Json(json!({"user": {"id": id, "email": "student@law.edu", "full_name": "Renamed Student"}}))
        .into_response()
}

async fn favorite_jobs(State(s): State<Arc<BackendState>>, Path(_id): Path<String>) -> Response {
    s.hit();
    Json(json!({"data": page_jobs(1, 2)})).into_response()
}

async fn jobs(State(s): State<Arc<BackendState>>, Query(query): Query<HashMap<String, String>>) -> Response {
    s.hit();
    *s.last_query.lock().unwrap() = query.clone();

    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: u32 = query.get("page_size").and_then(|p| p.parse().ok()).unwrap_or(9);

    if page == 1 && s.hold_page_one.load(Ordering::SeqCst) {
        s.page_one_arrived.notify_one();
        s.release_page_one.notified().await;
    }

    Json(json!({
        "jobs": page_jobs(page, page_size),
        "totalJobs": 40,
        "newJobs24h": 5,
        "lastUpdated": "2026-10-16T08:00:00Z",
        "page": page,
        "page_size": page_size
    }))
    .into_response()
}

async fn trigger(State(s): State<Arc<BackendState>>) -> Response {
    s.hit();
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn states(State(s): State<Arc<BackendState>>) -> Response {
    s.hit();
    Json(json!({"states": ["Georgia", "New York"]})).into_response()
}

async fn firms(State(s): State<Arc<BackendState>>) -> Response {
    s.hit();
    Json(json!({"firms": ["Cravath", "King & Spalding"]})).into_response()
}

async fn practices(State(s): State<Arc<BackendState>>) -> Response {
    s.hit();
    error(StatusCode::SERVICE_UNAVAILABLE, "Practice areas are being rebuilt")
}

async fn upload(State(s): State<Arc<BackendState>>, mut multipart: Multipart) -> Response {
    s.hit();
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            return Json(json!({
                "parsed_data": {"file_name": file_name, "size": bytes.len()},
                "file_url": format!("https://files.test/{file_name}")
            }))
            .into_response();
        }
    }
    error(StatusCode::BAD_REQUEST, "No file uploaded")
}

async fn cover_letter(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    Json(json!(format!("Dear {} hiring team", body["company"].as_str().unwrap_or("?")))).into_response()
}

async fn cover_letter_wrapped(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    Json(json!({"cover_letter": format!("Revised for {}", body["tone"].as_str().unwrap_or("?"))}))
        .into_response()
}

async fn improve_bullet(State(s): State<Arc<BackendState>>) -> Response {
    s.hit();
    (StatusCode::OK, "this is not json").into_response()
}

async fn rewrite(State(s): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    Json(json!({"rewritten_resume": {"summary": "Tailored summary"}})).into_response()
}

async fn export_pdf(State(s): State<Arc<BackendState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    s.hit();
    s.record_body(&body);
    *s.last_accept.lock().unwrap() = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ([(header::CONTENT_TYPE, "application/pdf")], PDF_BYTES).into_response()
}
