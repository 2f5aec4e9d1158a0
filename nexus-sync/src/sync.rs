//! Canvas → row store sync engine
//!
//! Walks every paginated course and assignment listing for one Canvas
//! account and upserts the results keyed on `(user_id, assignment_id)`.
//! Unlike the read/aggregate path, this path is all-or-nothing: the first
//! failure aborts the sync and surfaces a single actionable error; rows
//! persisted by earlier syncs are left untouched.

use crate::credentials::Credential;
use crate::db;
use crate::services::canvas_client::{
    normalize_base_url, CanvasAssignment, CanvasClient, CanvasConfig, CanvasCourse, CanvasError,
};
use chrono::{DateTime, Utc};
use nexus_common::{AssignmentRow, Error, Result, Source};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Rows per upsert transaction, matching the upstream page size
const UPSERT_CHUNK_SIZE: usize = 100;

/// One sync invocation
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Canvas API token (always a bearer token on this path)
    pub token: String,
    /// Optional Canvas base address override; normalized before use
    pub base_url: Option<String>,
    /// Row-store owner, textual UUID
    pub user_id: String,
}

/// Successful sync result
#[derive(Debug, Clone, Copy)]
pub struct SyncOutcome {
    /// Rows written (inserted or overwritten)
    pub count: usize,
}

impl From<CanvasError> for Error {
    fn from(err: CanvasError) -> Self {
        match err {
            CanvasError::Network(msg) => Error::Network(msg),
            CanvasError::Auth(status, body) => Error::Auth { status, body },
            CanvasError::Api(status, body) => Error::Upstream { status, body },
            CanvasError::Parse(msg) => Error::Internal(format!("Canvas response parse error: {}", msg)),
            CanvasError::PageLimitExceeded(pages) => Error::PageLimitExceeded(pages),
        }
    }
}

/// Validate a sync request without touching the network
///
/// Returns the parsed user id and trimmed token.
pub fn validate_request(request: &SyncRequest) -> Result<(Uuid, String)> {
    let user_id = Uuid::parse_str(request.user_id.trim())
        .map_err(|_| Error::Validation("userId must be a well-formed UUID".to_string()))?;

    let token = request.token.trim();
    if token.is_empty() {
        return Err(Error::Validation("A Canvas API token is required".to_string()));
    }

    Ok((user_id, token.to_string()))
}

/// Run one full sync and return the number of rows written
pub async fn run_sync(pool: &SqlitePool, request: SyncRequest) -> Result<SyncOutcome> {
    // Fail fast on bad input; no network I/O before this point
    let (user_id, token) = validate_request(&request)?;

    let base_url = normalize_base_url(request.base_url.as_deref().unwrap_or(""));
    let client = CanvasClient::new(CanvasConfig {
        base_url: base_url.clone(),
    })?;
    let credential = Credential::Bearer(token);

    info!(base_url = %base_url, user_id = %user_id, "Starting Canvas sync");

    let courses = client.list_courses(&credential).await?;
    info!("Found {} active courses", courses.len());

    let synced_at = Utc::now();
    let mut total = 0usize;

    for course in &courses {
        let course_view = CanvasCourse::from_value(course);
        let records = client.list_assignments(course_view.id, &credential).await?;
        if records.is_empty() {
            continue;
        }

        let rows: Vec<AssignmentRow> = records
            .iter()
            .map(|record| to_row(record, &course_view, user_id, synced_at))
            .collect();

        for chunk in rows.chunks(UPSERT_CHUNK_SIZE) {
            db::assignments::upsert_batch(pool, chunk)
                .await
                .map_err(|e| Error::Persistence(e.to_string()))?;
        }

        total += rows.len();
        info!(
            course_id = course_view.id,
            course_name = %course_view.name,
            count = rows.len(),
            "Synced course assignments"
        );
    }

    info!(total, "Canvas sync completed");

    Ok(SyncOutcome { count: total })
}

fn to_row(
    record: &Value,
    course: &CanvasCourse,
    user_id: Uuid,
    synced_at: DateTime<Utc>,
) -> AssignmentRow {
    let view = CanvasAssignment::from_value(record);

    AssignmentRow {
        user_id,
        assignment_id: view.id,
        course_id: course.id,
        course_name: course.name.clone(),
        name: view.name,
        description: view.description,
        due_at: view.due_at,
        points_possible: view.points_possible,
        grading_type: view.grading_type,
        html_url: view.html_url,
        created_at_raw: view.created_at,
        updated_at_raw: view.updated_at,
        source: Source::Canvas,
        raw: record.clone(),
        synced_at,
    }
}
