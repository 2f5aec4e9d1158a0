//! Canvas REST API client
//!
//! Talks to a versioned Canvas base path (`…/api/v1`) with bearer-token
//! authentication. All listing endpoints are paginated via the `Link`
//! header and walked with the pagination module.

use crate::credentials::Credential;
use crate::pagination::{self, PageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default base URL when no override is configured
pub const DEFAULT_BASE_URL: &str = "https://princeton.instructure.com/api/v1";

/// Legacy hostname rewritten to its current canonical hostname
const LEGACY_HOST: &str = "canvas.princeton.edu";
const CANONICAL_HOST: &str = "princeton.instructure.com";

const API_VERSION_SUFFIX: &str = "/api/v1";
const USER_AGENT: &str = "Nexus/0.1.0 (https://github.com/nexus-app/nexus)";
const PER_PAGE: u32 = 100;

/// Canvas client errors
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Canvas rejected credential ({0}): {1}")]
    Auth(u16, String),

    #[error("Canvas request failed ({0}): {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Pagination exceeded {0} pages")]
    PageLimitExceeded(usize),
}

impl From<PageError> for CanvasError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Network(msg) => CanvasError::Network(msg),
            PageError::Auth(status, body) => CanvasError::Auth(status, body),
            PageError::Api(status, body) => CanvasError::Api(status, body),
            PageError::Parse(msg) => CanvasError::Parse(msg),
            PageError::LimitExceeded(pages) => CanvasError::PageLimitExceeded(pages),
        }
    }
}

/// Canvas client configuration, threaded by value
///
/// Each client owns its base URL; there is no process-wide base address.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub base_url: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CanvasConfig {
    /// Config with a normalized base URL (see [`normalize_base_url`])
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }
}

/// Normalize a Canvas base address. Idempotent.
///
/// - empty input falls back to the default base URL
/// - prepends `https://` when no `http(s)://` scheme is present (an
///   explicit `http://` is left alone, as for a local proxy)
/// - rewrites the legacy hostname to its canonical replacement
/// - strips trailing slashes
/// - appends `/api/v1` unless already present (case-insensitive)
pub fn normalize_base_url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }

    let mut url = match trimmed.split_once("://") {
        Some((scheme, rest))
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            format!("{}://{}", scheme.to_ascii_lowercase(), rest)
        }
        _ => format!("https://{}", trimmed),
    };

    // Whole-hostname match only
    let rewritten = url.split_once("://").and_then(|(scheme, rest)| {
        let stripped = rest.strip_prefix(LEGACY_HOST)?;
        if stripped.is_empty() || stripped.starts_with('/') || stripped.starts_with(':') {
            Some(format!("{}://{}{}", scheme, CANONICAL_HOST, stripped))
        } else {
            None
        }
    });
    if let Some(rewritten) = rewritten {
        url = rewritten;
    }

    while url.ends_with('/') {
        url.pop();
    }

    if !url.to_ascii_lowercase().ends_with(API_VERSION_SUFFIX) {
        url.push_str(API_VERSION_SUFFIX);
    }

    url
}

/// Typed view of an upstream course record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CanvasCourse {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl CanvasCourse {
    /// Lossy view of a raw record; missing fields take defaults
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Typed view of an upstream assignment record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CanvasAssignment {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub points_possible: Option<f64>,
    pub grading_type: Option<String>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl CanvasAssignment {
    /// Lossy view of a raw record; missing fields take defaults
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Canvas API client
pub struct CanvasClient {
    http: reqwest::Client,
    config: CanvasConfig,
}

impl CanvasClient {
    pub fn new(config: CanvasConfig) -> Result<Self, CanvasError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CanvasError::Network(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// List all active courses visible to the credential, across all pages
    ///
    /// Tries the self-scoped listing first; when that fails, retries once
    /// against the generic course listing before surfacing the failure.
    pub async fn list_courses(&self, credential: &Credential) -> Result<Vec<Value>, CanvasError> {
        let primary = format!(
            "{}/users/self/courses?enrollment_state=active&per_page={}",
            self.config.base_url, PER_PAGE
        );

        match pagination::fetch_all_pages(&self.http, primary, credential).await {
            Ok(courses) => Ok(courses),
            Err(err) => {
                tracing::warn!(
                    "Self-scoped course listing failed ({}), retrying generic listing",
                    err
                );

                let fallback = format!(
                    "{}/courses?enrollment_state=active&per_page={}",
                    self.config.base_url, PER_PAGE
                );
                pagination::fetch_all_pages(&self.http, fallback, credential)
                    .await
                    .map_err(CanvasError::from)
            }
        }
    }

    /// List all assignments of one course, across all pages
    ///
    /// The course must be visible to the credential; upstream error
    /// responses pass through as-is, with no local validation.
    pub async fn list_assignments(
        &self,
        course_id: i64,
        credential: &Credential,
    ) -> Result<Vec<Value>, CanvasError> {
        let url = format!(
            "{}/courses/{}/assignments?per_page={}",
            self.config.base_url, course_id, PER_PAGE
        );

        let assignments = pagination::fetch_all_pages(&self.http, url, credential).await?;

        tracing::debug!(
            course_id,
            count = assignments.len(),
            "Fetched Canvas assignments"
        );

        Ok(assignments)
    }
}
