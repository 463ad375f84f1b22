// src/models/feedback.rs
use chrono::NaiveDateTime;
use sqlx::FromRow;

// Teacher feedback for one submission; at most one row per submission.
#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub submission_id: String,
    pub teacher_id: i64,
    pub score: f64,
    pub max_score: f64,
    pub rubric_clarity: i64,      // 1..=5
    pub rubric_completion: i64,   // 1..=5
    pub rubric_presentation: i64, // 1..=5
    pub comments: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

// One graded line of the per-student report
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub assignment_title: String,
    pub submitted_on: String,
    pub score: f64,
    pub max_score: f64,
}
