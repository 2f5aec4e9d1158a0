//! Assignment read endpoints
//!
//! The aggregate endpoint runs the live cross-source fetch; the plain GET
//! reads rows a previous sync persisted.

use crate::aggregate;
use crate::credentials::Credential;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::services::canvas_client::{CanvasClient, CanvasConfig};
use crate::services::gradescope_client::{GradescopeClient, GradescopeConfig};
use crate::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use nexus_common::{AssignmentRow, UnifiedAssignment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request payload for the live aggregation endpoint
///
/// Tokens arrive as raw strings here; their kind is inferred unless the
/// caller tags it explicitly via the `*TokenKind` fields ("bearer" or
/// "cookie"). Sources without a token contribute nothing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    #[serde(default)]
    pub canvas_token: Option<String>,
    #[serde(default)]
    pub canvas_base_url: Option<String>,
    #[serde(default)]
    pub gradescope_token: Option<String>,
    #[serde(default)]
    pub gradescope_token_kind: Option<String>,
    #[serde(default)]
    pub gradescope_base_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub count: usize,
    pub assignments: Vec<UnifiedAssignment>,
}

fn credential_from(raw: &str, kind: Option<&str>) -> ApiResult<Option<Credential>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match kind {
        Some("bearer") => Ok(Some(Credential::Bearer(trimmed.to_string()))),
        Some("cookie") => Ok(Some(Credential::Cookie(trimmed.to_string()))),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown token kind: {:?} (expected \"bearer\" or \"cookie\")",
            other
        ))),
        None => Ok(Credential::infer(trimmed)),
    }
}

/// POST /api/assignments/aggregate handler
///
/// Never fails on upstream trouble: a failing source or course degrades to
/// an empty contribution and the rest of the result is still returned.
pub async fn aggregate_assignments(
    State(state): State<AppState>,
    Json(payload): Json<AggregateRequest>,
) -> ApiResult<Json<AggregateResponse>> {
    let concurrency = state.config.concurrency;

    let mut canvas_items = Vec::new();
    if let Some(token) = payload
        .canvas_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        // Canvas always authenticates with a bearer token
        let credential = Credential::Bearer(token.to_string());
        let config = match payload.canvas_base_url.as_deref() {
            Some(base) => CanvasConfig::with_base_url(base),
            None => CanvasConfig {
                base_url: state.config.canvas_base_url.clone(),
            },
        };
        let client =
            CanvasClient::new(config).map_err(|e| ApiError::Internal(e.to_string()))?;
        canvas_items = aggregate::aggregate_canvas(&client, &credential, concurrency).await;
    }

    let mut gradescope_items = Vec::new();
    if let Some(credential) = credential_from(
        payload.gradescope_token.as_deref().unwrap_or(""),
        payload.gradescope_token_kind.as_deref(),
    )? {
        let config = match payload.gradescope_base_url.as_deref() {
            Some(base) => GradescopeConfig::with_base_url(base),
            None => GradescopeConfig {
                base_url: state.config.gradescope_base_url.clone(),
            },
        };
        let client =
            GradescopeClient::new(config).map_err(|e| ApiError::Internal(e.to_string()))?;
        gradescope_items =
            aggregate::aggregate_gradescope(&client, &credential, concurrency).await;
    }

    let assignments = aggregate::merge(canvas_items, gradescope_items);

    Ok(Json(AggregateResponse {
        count: assignments.len(),
        assignments,
    }))
}

/// Query for the persisted-rows read
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub assignments: Vec<AssignmentRow>,
}

/// GET /api/assignments?user_id=… handler
///
/// Returns rows persisted by earlier syncs, due date ascending with
/// undated rows last.
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let user_id = Uuid::parse_str(query.user_id.trim())
        .map_err(|_| ApiError::BadRequest("user_id must be a well-formed UUID".to_string()))?;

    let assignments = db::assignments::list_for_user(&state.db, user_id).await?;

    Ok(Json(ListResponse {
        count: assignments.len(),
        assignments,
    }))
}

/// Build assignment routes
pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assignments/aggregate", post(aggregate_assignments))
        .route("/api/assignments", get(list_assignments))
}
