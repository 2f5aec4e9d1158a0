//! Shared test helpers: fake LMS upstreams bound to ephemeral ports
//!
//! The fakes speak just enough of each upstream's dialect for the clients
//! under test: Canvas paginates with `Link` headers and bearer auth,
//! Gradescope serves single-shot `.json` listings with cookie auth.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const CANVAS_TOKEN: &str = "canvas-token";
pub const GRADESCOPE_COOKIE: &str = "signed_token=deadbeef";

/// A running fake upstream
pub struct FakeUpstream {
    /// `http://127.0.0.1:<port>` (no path suffix)
    pub base: String,
    /// Total requests served, including rejected ones
    pub requests: Arc<AtomicUsize>,
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeUpstream {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Behavior knobs for the fake Canvas upstream
#[derive(Debug, Clone)]
pub struct FakeCanvasSpec {
    pub course_count: usize,
    pub assignments_per_course: usize,
    /// Items per page on every listing
    pub per_page: usize,
    /// Course whose assignment listing returns 500
    pub fail_course: Option<i64>,
    /// When false, `/users/self/courses` answers 404 and only the generic
    /// listing works
    pub self_scoped_available: bool,
}

impl Default for FakeCanvasSpec {
    fn default() -> Self {
        Self {
            course_count: 3,
            assignments_per_course: 3,
            per_page: 2,
            fail_course: None,
            self_scoped_available: true,
        }
    }
}

#[derive(Clone)]
struct CanvasState {
    base: String,
    requests: Arc<AtomicUsize>,
    spec: Arc<FakeCanvasSpec>,
}

pub async fn spawn_fake_canvas(spec: FakeCanvasSpec) -> FakeUpstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);
    let requests = Arc::new(AtomicUsize::new(0));

    let state = CanvasState {
        base: base.clone(),
        requests: requests.clone(),
        spec: Arc::new(spec),
    };

    let app = Router::new()
        .route("/api/v1/users/self/courses", get(canvas_self_courses))
        .route("/api/v1/courses", get(canvas_courses))
        .route("/api/v1/courses/:course_id/assignments", get(canvas_assignments))
        .with_state(state);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeUpstream {
        base,
        requests,
        _handle: handle,
    }
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", CANVAS_TOKEN);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"errors": [{"message": "Invalid access token."}]})),
    )
        .into_response()
}

fn page_param(params: &HashMap<String, String>) -> usize {
    params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
        .max(1)
}

/// Serve one page of `all`, declaring the next page via the Link header
fn paged(state: &CanvasState, path: &str, all: &[Value], page: usize) -> Response {
    let per_page = state.spec.per_page;
    let start = (page - 1) * per_page;
    let items: Vec<Value> = all.iter().skip(start).take(per_page).cloned().collect();

    let mut response = Json(Value::Array(items)).into_response();

    if start + per_page < all.len() {
        let next = format!(
            "{}{}?page={}&per_page={}",
            state.base,
            path,
            page + 1,
            per_page
        );
        let link = format!("<{}>; rel=\"next\"", next);
        response
            .headers_mut()
            .insert(header::LINK, link.parse().unwrap());
    }

    response
}

fn course_records(spec: &FakeCanvasSpec) -> Vec<Value> {
    (1..=spec.course_count as i64)
        .map(|id| json!({"id": id, "name": format!("Course {}", id)}))
        .collect()
}

async fn canvas_self_courses(
    State(state): State<CanvasState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if !state.spec.self_scoped_available {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": [{"message": "The specified resource does not exist."}]})),
        )
            .into_response();
    }
    if !bearer_ok(&headers) {
        return unauthorized();
    }

    let all = course_records(&state.spec);
    paged(&state, "/api/v1/users/self/courses", &all, page_param(&params))
}

async fn canvas_courses(
    State(state): State<CanvasState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if !bearer_ok(&headers) {
        return unauthorized();
    }

    let all = course_records(&state.spec);
    paged(&state, "/api/v1/courses", &all, page_param(&params))
}

/// Deterministic due date for an assignment; the last assignment of every
/// course has none
fn due_at(spec: &FakeCanvasSpec, course_id: i64, index: usize) -> Value {
    if index == spec.assignments_per_course {
        Value::Null
    } else {
        let day = ((course_id as usize * 7 + index) % 27) + 1;
        json!(format!("2025-10-{:02}T12:00:00Z", day))
    }
}

async fn canvas_assignments(
    State(state): State<CanvasState>,
    Path(course_id): Path<i64>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if !bearer_ok(&headers) {
        return unauthorized();
    }

    if state.spec.fail_course == Some(course_id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"errors": [{"message": "An error occurred."}]})),
        )
            .into_response();
    }

    let all: Vec<Value> = (1..=state.spec.assignments_per_course)
        .map(|index| {
            let id = course_id * 100 + index as i64;
            json!({
                "id": id,
                "name": format!("Assignment {}", id),
                "description": format!("Do the work for assignment {}", id),
                "due_at": due_at(&state.spec, course_id, index),
                "points_possible": 10.0,
                "grading_type": "points",
                "html_url": format!("{}/courses/{}/assignments/{}", state.base, course_id, id),
                "created_at": "2025-09-01T00:00:00Z",
                "updated_at": "2025-09-02T00:00:00Z",
            })
        })
        .collect();

    let path = format!("/api/v1/courses/{}/assignments", course_id);
    paged(&state, &path, &all, page_param(&params))
}

#[derive(Clone)]
struct GradescopeState {
    requests: Arc<AtomicUsize>,
}

/// Fake Gradescope: one course, two assignments (one undated), cookie auth
pub async fn spawn_fake_gradescope() -> FakeUpstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);
    let requests = Arc::new(AtomicUsize::new(0));

    let state = GradescopeState {
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/courses.json", get(gradescope_courses))
        .route("/courses/:course_id/assignments.json", get(gradescope_assignments))
        .route("/assignments/:file", get(gradescope_assignment))
        .with_state(state);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeUpstream {
        base,
        requests,
        _handle: handle,
    }
}

fn cookie_ok(headers: &HeaderMap) -> bool {
    headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) == Some(GRADESCOPE_COOKIE)
}

async fn gradescope_courses(State(state): State<GradescopeState>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if !cookie_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "not signed in"}))).into_response();
    }

    Json(json!([{"id": 1, "name": "GS Course", "course_code": "GS101"}])).into_response()
}

/// Single-assignment lookup; the path segment looks like `42.json`
async fn gradescope_assignment(
    State(state): State<GradescopeState>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if !cookie_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "not signed in"}))).into_response();
    }

    let id: i64 = match file.strip_suffix(".json").and_then(|s| s.parse().ok()) {
        Some(id) => id,
        None => return (StatusCode::NOT_FOUND, Json(json!({"error": "no such assignment"}))).into_response(),
    };

    Json(json!({
        "id": id,
        "name": format!("GS Assignment {}", id),
        "description": "Standalone lookup",
        "due_date": "2025-11-20T23:59:00Z",
        "course_id": 1,
    }))
    .into_response()
}

async fn gradescope_assignments(
    State(state): State<GradescopeState>,
    Path(course_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    if !cookie_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "not signed in"}))).into_response();
    }

    Json(json!([
        {
            "id": 501,
            "name": "GS Lab",
            "description": "Lab writeup",
            "due_date": "2025-10-05T12:00:00Z",
            "course_id": course_id,
        },
        {
            "id": 101,
            "name": "GS Quiz",
            "due_date": null,
            "course_id": course_id,
        },
    ]))
    .into_response()
}
