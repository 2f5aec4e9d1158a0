//! Generic Canvas pass-through proxy
//!
//! Forwards any verb, query string, and body under `/api/canvas/{path}` to
//! the configured Canvas base URL and relays the upstream status, body,
//! and content type verbatim. Exists so a browser frontend can reach
//! Canvas without tripping over CORS; every call must carry its own
//! `Authorization` header, which is forwarded untouched.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::Response;
use axum::routing::any;
use axum::Router;

/// Handler for any method under /api/canvas/*path
pub async fn proxy_canvas(
    State(state): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let Some(authorization) = headers.get(header::AUTHORIZATION) else {
        return Err(ApiError::Unauthorized(
            "An Authorization header is required".to_string(),
        ));
    };

    let mut url = format!("{}/{}", state.config.canvas_base_url, path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }

    tracing::debug!(method = %method, url = %url, "Proxying Canvas request");

    let upstream_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|_| ApiError::BadRequest(format!("Unsupported method: {}", method)))?;

    let mut request = state
        .http
        .request(upstream_method, &url)
        .header(reqwest::header::AUTHORIZATION, authorization.as_bytes())
        .header(reqwest::header::ACCEPT, "application/json");

    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        request = request.header(reqwest::header::CONTENT_TYPE, content_type.as_bytes());
    }

    if !body.is_empty() {
        request = request.body(body.to_vec());
    }

    let upstream = request
        .send()
        .await
        .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    let mut builder = Response::builder().status(status);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Build proxy routes
pub fn proxy_routes() -> Router<AppState> {
    Router::new().route("/api/canvas/*path", any(proxy_canvas))
}
