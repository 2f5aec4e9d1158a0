//! Canvas sync endpoint
//!
//! `POST /api/canvas/sync` with `{ token, baseUrl?, userId }` walks every
//! course and assignment listing for the account and upserts the results
//! into the row store. Responds `{ count }` on success.

use crate::sync::{run_sync, SyncRequest};
use crate::{ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

/// Request payload, matching the frontend's wire shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSyncRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub user_id: String,
}

/// Response payload
#[derive(Debug, Serialize)]
pub struct CanvasSyncResponse {
    /// Rows written by this sync
    pub count: usize,
}

/// POST /api/canvas/sync handler
///
/// Validation failures (malformed userId, blank token) are rejected with
/// 400 before any upstream request is issued.
pub async fn sync_canvas(
    State(state): State<AppState>,
    Json(payload): Json<CanvasSyncRequest>,
) -> ApiResult<Json<CanvasSyncResponse>> {
    let outcome = run_sync(
        &state.db,
        SyncRequest {
            token: payload.token,
            base_url: payload.base_url,
            user_id: payload.user_id,
        },
    )
    .await?;

    Ok(Json(CanvasSyncResponse {
        count: outcome.count,
    }))
}

/// Build sync routes
pub fn sync_routes() -> Router<AppState> {
    Router::new().route("/api/canvas/sync", post(sync_canvas))
}
