//! Unified assignment model shared across Nexus services
//!
//! Upstream systems (Canvas, Gradescope) each return their own record shape;
//! everything downstream of the adapters works with `UnifiedAssignment`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Known upstream origins of an assignment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Canvas,
    Gradescope,
}

impl Source {
    /// Stable lowercase tag, used as the id prefix and the persisted source column
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Canvas => "canvas",
            Source::Gradescope => "gradescope",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-agnostic assignment record used after normalization
///
/// Constructed fresh on every aggregation pass; never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedAssignment {
    /// Globally unique id: `"{source}:{source_id}"`. The prefix prevents
    /// collisions between sources that reuse small integer ids.
    pub id: String,
    pub source: Source,
    /// Upstream numeric identifier, unique only within its source
    pub source_id: i64,
    pub course_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    /// `None` means "no due date"; such items sort after all dated items
    pub due_date: Option<DateTime<Utc>>,
    /// Score or points-possible value; semantics vary by source
    pub grade: Option<f64>,
    /// Original upstream record, retained for debugging and for fields not
    /// promoted into the unified shape
    pub raw: Value,
}

impl UnifiedAssignment {
    /// Prefixed id for a source/source-id pair
    pub fn unified_id(source: Source, source_id: i64) -> String {
        format!("{}:{}", source.as_str(), source_id)
    }
}

/// One persisted assignment row, upserted on `(user_id, assignment_id)`
///
/// Timestamp-ish upstream fields are kept as the raw strings the upstream
/// returned; `synced_at` is stamped by the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub user_id: Uuid,
    pub assignment_id: i64,
    pub course_id: i64,
    pub course_name: String,
    pub name: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub points_possible: Option<f64>,
    pub grading_type: Option<String>,
    pub html_url: Option<String>,
    pub created_at_raw: Option<String>,
    pub updated_at_raw: Option<String>,
    pub source: Source,
    pub raw: Value,
    pub synced_at: DateTime<Utc>,
}
