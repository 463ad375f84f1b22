// src/models/student.rs
use chrono::NaiveDateTime;
use sqlx::FromRow;

// A student tracked by the tracker page, read from the 'students' table
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: i64, // SQLite INTEGER -> i64
    pub name: String,
    pub roll: String,
    pub created_at: Option<NaiveDateTime>,
}
