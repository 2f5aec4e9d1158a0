//! Gradescope API client
//!
//! Gradescope has no single stable public API for students; this client
//! wraps the common `.json` endpoint pattern and is meant to be pointed at
//! an institution's own integration or proxy via the configured base URL.
//! Listings are single GETs (no link-header pagination on this upstream).

use crate::credentials::Credential;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default base URL when no override is configured
pub const DEFAULT_BASE_URL: &str = "https://www.gradescope.com/api";

const USER_AGENT: &str = "Nexus/0.1.0 (https://github.com/nexus-app/nexus)";

/// Gradescope client errors
#[derive(Debug, Error)]
pub enum GradescopeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gradescope rejected credential ({0}): {1}")]
    Auth(u16, String),

    #[error("Gradescope request failed ({0}): {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Gradescope client configuration, threaded by value
#[derive(Debug, Clone)]
pub struct GradescopeConfig {
    pub base_url: String,
}

impl Default for GradescopeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GradescopeConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::default();
        }
        Self {
            base_url: trimmed.to_string(),
        }
    }
}

/// Typed view of an upstream assignment record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GradescopeAssignment {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub course_id: Option<i64>,
}

impl GradescopeAssignment {
    /// Lossy view of a raw record; missing fields take defaults
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Typed view of an upstream course record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GradescopeCourse {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub course_code: Option<String>,
}

impl GradescopeCourse {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Gradescope API client
pub struct GradescopeClient {
    http: reqwest::Client,
    config: GradescopeConfig,
}

impl GradescopeClient {
    pub fn new(config: GradescopeConfig) -> Result<Self, GradescopeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GradescopeError::Network(e.to_string()))?;

        Ok(Self { http, config })
    }

    async fn get_json(&self, path: &str, credential: &Credential) -> Result<Value, GradescopeError> {
        let url = format!("{}{}", self.config.base_url, path);

        tracing::debug!(url = %url, "Querying Gradescope");

        let response = credential
            .apply(self.http.get(&url))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GradescopeError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(GradescopeError::Auth(status.as_u16(), body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GradescopeError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| GradescopeError::Parse(e.to_string()))
    }

    async fn get_list(&self, path: &str, credential: &Credential) -> Result<Vec<Value>, GradescopeError> {
        match self.get_json(path, credential).await? {
            Value::Array(items) => Ok(items),
            _ => Err(GradescopeError::Parse(format!(
                "expected a JSON array from {}",
                path
            ))),
        }
    }

    /// List courses the credential is enrolled in
    pub async fn list_courses(&self, credential: &Credential) -> Result<Vec<Value>, GradescopeError> {
        self.get_list("/courses.json", credential).await
    }

    /// List assignments for a course
    ///
    /// The course must be visible to the credential; upstream error
    /// responses pass through as-is, with no local validation.
    pub async fn list_assignments(
        &self,
        course_id: i64,
        credential: &Credential,
    ) -> Result<Vec<Value>, GradescopeError> {
        self.get_list(&format!("/courses/{}/assignments.json", course_id), credential)
            .await
    }

    /// Fetch a single assignment by id
    pub async fn fetch_assignment(
        &self,
        assignment_id: i64,
        credential: &Credential,
    ) -> Result<Value, GradescopeError> {
        self.get_json(&format!("/assignments/{}.json", assignment_id), credential)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = GradescopeConfig::with_base_url("https://gradescope.school.edu/api/");
        assert_eq!(config.base_url, "https://gradescope.school.edu/api");
    }

    #[test]
    fn test_config_empty_uses_default() {
        let config = GradescopeConfig::with_base_url("  ");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_assignment_view_tolerates_missing_fields() {
        let a = GradescopeAssignment::from_value(&serde_json::json!({"id": 9, "name": "Lab"}));
        assert_eq!(a.id, 9);
        assert_eq!(a.name, "Lab");
        assert!(a.due_date.is_none());
        assert!(a.course_id.is_none());
    }
}
