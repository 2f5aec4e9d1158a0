//! Normalization of upstream records into `UnifiedAssignment`
//!
//! Mapping is total: every upstream record yields a unified record, with
//! absent fields mapped to `None` and unparseable due dates degrading to
//! "no due date". Callers that know the record's origin pass the source
//! tag explicitly; `normalize_any` keeps shape inference for the one call
//! site that genuinely receives untagged data.

use crate::services::canvas_client::CanvasAssignment;
use crate::services::gradescope_client::GradescopeAssignment;
use chrono::{DateTime, NaiveDate, Utc};
use nexus_common::{Source, UnifiedAssignment};
use serde_json::Value;

/// Parse an upstream timestamp string, best-effort
///
/// Accepts RFC 3339 (the Canvas `due_at` format) and a bare `YYYY-MM-DD`
/// date (taken as midnight UTC). Anything else is treated as "no date".
pub fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

/// Normalize a Canvas-shaped record
///
/// `course_id` comes from the caller because Canvas assignment listings are
/// fetched per course and the records do not repeat the course id.
pub fn normalize_canvas(record: &Value, course_id: Option<i64>) -> UnifiedAssignment {
    let view = CanvasAssignment::from_value(record);

    UnifiedAssignment {
        id: UnifiedAssignment::unified_id(Source::Canvas, view.id),
        source: Source::Canvas,
        source_id: view.id,
        course_id,
        name: view.name,
        description: view.description,
        due_date: view.due_at.as_deref().and_then(parse_due_date),
        grade: None,
        raw: record.clone(),
    }
}

/// Normalize a Gradescope-shaped record
pub fn normalize_gradescope(record: &Value) -> UnifiedAssignment {
    let view = GradescopeAssignment::from_value(record);

    UnifiedAssignment {
        id: UnifiedAssignment::unified_id(Source::Gradescope, view.id),
        source: Source::Gradescope,
        source_id: view.id,
        course_id: view.course_id,
        name: view.name,
        description: view.description,
        due_date: view.due_date.as_deref().and_then(parse_due_date),
        grade: None,
        raw: record.clone(),
    }
}

/// Normalize a record of either shape
///
/// An explicit source tag wins unconditionally. Without one, a record
/// exposing a `due_at` key (even null) is classified as Canvas; anything
/// else falls back to the Gradescope mapping. The inference order is
/// arbitrary, carried over from the original two-source heuristic.
pub fn normalize_any(
    record: &Value,
    source: Option<Source>,
    course_id: Option<i64>,
) -> UnifiedAssignment {
    match source {
        Some(Source::Canvas) => normalize_canvas(record, course_id),
        Some(Source::Gradescope) => normalize_gradescope(record),
        None => {
            if record.get("due_at").is_some() {
                normalize_canvas(record, course_id)
            } else {
                normalize_gradescope(record)
            }
        }
    }
}
