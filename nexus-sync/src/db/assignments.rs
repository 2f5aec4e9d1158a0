//! Persisted assignment rows
//!
//! One row per `(user_id, assignment_id)`; sync batches upsert so repeated
//! syncs overwrite rather than duplicate.

use chrono::{DateTime, Utc};
use nexus_common::{AssignmentRow, Result, Source};
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Upsert one batch of rows inside a single transaction
///
/// The batch either lands fully or not at all; rows persisted by earlier
/// batches or earlier syncs are untouched either way.
pub async fn upsert_batch(pool: &SqlitePool, rows: &[AssignmentRow]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO canvas_assignments (
                user_id, assignment_id, course_id, course_name, name, description,
                due_at, points_possible, grading_type, html_url,
                created_at_raw, updated_at_raw, source, raw, synced_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, assignment_id) DO UPDATE SET
                course_id = excluded.course_id,
                course_name = excluded.course_name,
                name = excluded.name,
                description = excluded.description,
                due_at = excluded.due_at,
                points_possible = excluded.points_possible,
                grading_type = excluded.grading_type,
                html_url = excluded.html_url,
                created_at_raw = excluded.created_at_raw,
                updated_at_raw = excluded.updated_at_raw,
                source = excluded.source,
                raw = excluded.raw,
                synced_at = excluded.synced_at
            "#,
        )
        .bind(row.user_id.to_string())
        .bind(row.assignment_id)
        .bind(row.course_id)
        .bind(&row.course_name)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.due_at)
        .bind(row.points_possible)
        .bind(&row.grading_type)
        .bind(&row.html_url)
        .bind(&row.created_at_raw)
        .bind(&row.updated_at_raw)
        .bind(row.source.as_str())
        .bind(row.raw.to_string())
        .bind(row.synced_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Load all persisted rows for one user, due date ascending, undated last
pub async fn list_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<AssignmentRow>> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, assignment_id, course_id, course_name, name, description,
               due_at, points_possible, grading_type, html_url,
               created_at_raw, updated_at_raw, source, raw, synced_at
        FROM canvas_assignments
        WHERE user_id = ?
        ORDER BY (due_at IS NULL), due_at
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_from_sqlite).collect()
}

/// Count persisted rows for one user
pub async fn count_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM canvas_assignments WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(pool)
            .await?;

    Ok(count)
}

fn row_from_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<AssignmentRow> {
    let user_id: String = row.get("user_id");
    let source: String = row.get("source");
    let raw: String = row.get("raw");
    let synced_at: String = row.get("synced_at");

    Ok(AssignmentRow {
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| nexus_common::Error::Internal(format!("Bad user_id in row store: {}", e)))?,
        assignment_id: row.get("assignment_id"),
        course_id: row.get("course_id"),
        course_name: row.get("course_name"),
        name: row.get("name"),
        description: row.get("description"),
        due_at: row.get("due_at"),
        points_possible: row.get("points_possible"),
        grading_type: row.get("grading_type"),
        html_url: row.get("html_url"),
        created_at_raw: row.get("created_at_raw"),
        updated_at_raw: row.get("updated_at_raw"),
        source: match source.as_str() {
            "gradescope" => Source::Gradescope,
            _ => Source::Canvas,
        },
        raw: serde_json::from_str::<Value>(&raw).unwrap_or(Value::Null),
        synced_at: DateTime::parse_from_rfc3339(&synced_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
