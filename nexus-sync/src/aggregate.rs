//! Cross-source assignment aggregation
//!
//! Fetches per-course assignment listings for each configured source,
//! normalizes them, and merges everything into one display-ready sequence.
//! Per-course and per-source failures degrade to an empty contribution;
//! partial results are always favored over total failure on this path.

use crate::credentials::Credential;
use crate::normalize::{normalize_canvas, normalize_gradescope};
use crate::services::canvas_client::{CanvasClient, CanvasCourse};
use crate::services::gradescope_client::{GradescopeClient, GradescopeCourse};
use futures::future;
use futures::stream::{self, StreamExt};
use nexus_common::UnifiedAssignment;
use std::cmp::Ordering;
use std::future::Future;

/// Sort ascending by due date, undated items last
///
/// Stable: equal keys (including two undated items) retain their relative
/// input order, so ties break by concatenation order.
pub fn sort_by_due_date(items: &mut [UnifiedAssignment]) {
    items.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Merge per-source results (Canvas first, then Gradescope) and sort
pub fn merge(canvas: Vec<UnifiedAssignment>, gradescope: Vec<UnifiedAssignment>) -> Vec<UnifiedAssignment> {
    let mut merged = canvas;
    merged.extend(gradescope);
    sort_by_due_date(&mut merged);
    merged
}

/// Run per-course fetch futures, preserving course order in the output
///
/// Unbounded by default (every course fetch in flight at once, as the
/// original behaves); a configured cap bounds in-flight requests without
/// changing output order.
async fn collect_ordered<F, T>(futures: Vec<F>, concurrency: Option<usize>) -> Vec<T>
where
    F: Future<Output = T>,
{
    match concurrency {
        Some(cap) if cap > 0 => stream::iter(futures).buffered(cap).collect().await,
        _ => future::join_all(futures).await,
    }
}

/// Fetch and normalize all Canvas assignments visible to the credential
///
/// Never fails: a failed course listing yields an empty result, and a
/// failed per-course assignment fetch skips just that course.
pub async fn aggregate_canvas(
    client: &CanvasClient,
    credential: &Credential,
    concurrency: Option<usize>,
) -> Vec<UnifiedAssignment> {
    let courses = match client.list_courses(credential).await {
        Ok(courses) => courses,
        Err(err) => {
            tracing::warn!("Canvas course listing failed, contributing nothing: {}", err);
            return Vec::new();
        }
    };

    let fetches: Vec<_> = courses
        .iter()
        .map(|course| {
            let course_id = CanvasCourse::from_value(course).id;
            async move {
                match client.list_assignments(course_id, credential).await {
                    Ok(records) => records
                        .iter()
                        .map(|record| normalize_canvas(record, Some(course_id)))
                        .collect(),
                    Err(err) => {
                        tracing::warn!(course_id, "Skipping Canvas course: {}", err);
                        Vec::new()
                    }
                }
            }
        })
        .collect();

    collect_ordered(fetches, concurrency)
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Fetch and normalize all Gradescope assignments visible to the credential
///
/// Same failure isolation as the Canvas path.
pub async fn aggregate_gradescope(
    client: &GradescopeClient,
    credential: &Credential,
    concurrency: Option<usize>,
) -> Vec<UnifiedAssignment> {
    let courses = match client.list_courses(credential).await {
        Ok(courses) => courses,
        Err(err) => {
            tracing::warn!("Gradescope course listing failed, contributing nothing: {}", err);
            return Vec::new();
        }
    };

    let fetches: Vec<_> = courses
        .iter()
        .map(|course| {
            let course_id = GradescopeCourse::from_value(course).id;
            async move {
                match client.list_assignments(course_id, credential).await {
                    Ok(records) => records.iter().map(normalize_gradescope).collect(),
                    Err(err) => {
                        tracing::warn!(course_id, "Skipping Gradescope course: {}", err);
                        Vec::new()
                    }
                }
            }
        })
        .collect();

    collect_ordered(fetches, concurrency)
        .await
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use nexus_common::Source;
    use serde_json::json;

    fn item(id: i64, source: Source, due: Option<&str>) -> UnifiedAssignment {
        UnifiedAssignment {
            id: UnifiedAssignment::unified_id(source, id),
            source,
            source_id: id,
            course_id: None,
            name: format!("assignment {}", id),
            description: None,
            due_date: due.map(|d| d.parse::<DateTime<Utc>>().unwrap()),
            grade: None,
            raw: json!({}),
        }
    }

    #[test]
    fn test_sort_dated_before_undated() {
        let mut items = vec![
            item(1, Source::Canvas, None),
            item(2, Source::Canvas, Some("2025-06-01T00:00:00Z")),
            item(3, Source::Canvas, Some("2025-01-01T00:00:00Z")),
            item(4, Source::Gradescope, None),
        ];

        sort_by_due_date(&mut items);

        let ids: Vec<_> = items.iter().map(|i| i.source_id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut items = vec![
            item(10, Source::Canvas, Some("2025-06-01T00:00:00Z")),
            item(11, Source::Gradescope, Some("2025-06-01T00:00:00Z")),
            item(12, Source::Canvas, Some("2025-06-01T00:00:00Z")),
        ];

        sort_by_due_date(&mut items);

        let ids: Vec<_> = items.iter().map(|i| i.source_id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_merge_concatenates_canvas_first_then_sorts() {
        let canvas = vec![item(1, Source::Canvas, None)];
        let gradescope = vec![
            item(2, Source::Gradescope, Some("2025-02-02T00:00:00Z")),
            item(3, Source::Gradescope, None),
        ];

        let merged = merge(canvas, gradescope);

        let ids: Vec<_> = merged.iter().map(|i| i.id.clone()).collect();
        // Dated first; undated keep concatenation order (canvas before gradescope)
        assert_eq!(ids, vec!["gradescope:2", "canvas:1", "gradescope:3"]);
    }

    #[test]
    fn test_merge_ids_unique_across_sources_with_same_source_id() {
        let merged = merge(
            vec![item(7, Source::Canvas, None)],
            vec![item(7, Source::Gradescope, None)],
        );

        assert_eq!(merged.len(), 2);
        assert_ne!(merged[0].id, merged[1].id);
    }
}
