// src/services/assignment_service.rs
use crate::{
    error::{AppError, AppResult},
    models::assignment::{Assignment, AssignmentOverview},
};
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// Inserts an assignment and returns the fresh row id.
pub async fn create_assignment(
    db_pool: &SqlitePool,
    title: &str,
    description: &str,
    due_date: &str,
) -> AppResult<i64> {
    // Normalize through chrono so only real YYYY-MM-DD dates reach the table
    let due = NaiveDate::parse_from_str(due_date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation("Due date must be a valid date in YYYY-MM-DD format.".to_string())
    })?;

    let result = sqlx::query("INSERT INTO assignments (title, description, due_date) VALUES (?, ?, ?)")
        .bind(title)
        .bind(description)
        .bind(due.format("%Y-%m-%d").to_string())
        .execute(db_pool)
        .await?;

    tracing::info!("✅ Assignment '{}' created.", title);
    Ok(result.last_insert_rowid())
}

/// Every assignment, in bare table order (the tracker page adds no ORDER BY).
pub async fn find_all_assignments(db_pool: &SqlitePool) -> AppResult<Vec<Assignment>> {
    let assignments = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments")
        .fetch_all(db_pool)
        .await?;
    Ok(assignments)
}

pub async fn find_assignment_by_id(
    db_pool: &SqlitePool,
    assignment_id: i64,
) -> AppResult<Option<Assignment>> {
    let assignment = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = ?")
        .bind(assignment_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(assignment)
}

/// Dashboard listing: newest assignments first, each with its submission count.
pub async fn list_with_submission_counts(
    db_pool: &SqlitePool,
) -> AppResult<Vec<AssignmentOverview>> {
    let rows = sqlx::query_as::<_, AssignmentOverview>(
        r#"
        SELECT a.id, a.title, a.due_date, COUNT(s.id) AS submission_count
        FROM assignments a
        LEFT JOIN submissions s ON s.assignment_id = a.id
        GROUP BY a.id
        ORDER BY a.id DESC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}
