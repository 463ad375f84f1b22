// src/services/student_service.rs
use crate::{
    error::{AppError, AppResult},
    models::student::Student,
};
use sqlx::SqlitePool;

/// Inserts a student and returns the fresh row id.
pub async fn create_student(db_pool: &SqlitePool, name: &str, roll: &str) -> AppResult<i64> {
    tracing::info!("Creating student '{}' (roll {})", name, roll);

    let result = sqlx::query("INSERT INTO students (name, roll) VALUES (?, ?)")
        .bind(name)
        .bind(roll)
        .execute(db_pool)
        .await;

    // A duplicate roll surfaces as a UNIQUE violation (SQLite codes 19/2067/1555)
    if let Err(sqlx::Error::Database(db_err)) = &result {
        if db_err
            .code()
            .map_or(false, |c| c == "19" || c == "2067" || c == "1555")
        {
            tracing::warn!("Rejected student insert: roll '{}' already exists.", roll);
            return Err(AppError::Validation(format!(
                "A student with roll number '{}' already exists.",
                roll
            )));
        }
    }
    let result = result?;

    tracing::info!("✅ Student '{}' created.", name);
    Ok(result.last_insert_rowid())
}

/// Every student, in bare table order (the tracker page adds no ORDER BY).
pub async fn find_all_students(db_pool: &SqlitePool) -> AppResult<Vec<Student>> {
    let students = sqlx::query_as::<_, Student>("SELECT * FROM students")
        .fetch_all(db_pool)
        .await?;
    Ok(students)
}

pub async fn find_student_by_id(db_pool: &SqlitePool, student_id: i64) -> AppResult<Option<Student>> {
    let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = ?")
        .bind(student_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(student)
}
