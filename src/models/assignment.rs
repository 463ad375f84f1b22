// src/models/assignment.rs
use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: String, // YYYY-MM-DD
    pub created_at: Option<NaiveDateTime>,
}

// Dashboard listing row: an assignment with its submission count
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentOverview {
    pub id: i64,
    pub title: String,
    pub due_date: String,
    pub submission_count: i64,
}
