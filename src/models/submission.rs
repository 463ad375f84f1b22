// src/models/submission.rs
use sqlx::FromRow;

// --- Status vocabulary ---

// The only two values the tracker form accepts; stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Submitted,
    Pending,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "Submitted",
            SubmissionStatus::Pending => "Pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Submitted" => Some(SubmissionStatus::Submitted),
            "Pending" => Some(SubmissionStatus::Pending),
            _ => None,
        }
    }
}

// --- Join rows for the read-side pages ---

// One line of the tracker status table (students x assignments x submissions)
#[derive(Debug, Clone, FromRow)]
pub struct StatusRow {
    pub student_name: String,
    pub assignment_title: String,
    pub status: String,
    pub submitted_on: String,
}

// One line of the per-assignment listing; 'graded' is derived from
// feedback existence, the submission row itself is never rewritten.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentSubmissionRow {
    pub id: String,
    pub student_name: String,
    pub roll: String,
    pub status: String,
    pub submitted_on: String,
    pub plagiarism_score: f64,
    pub graded: bool,
}

// Everything the review page needs about one submission
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionDetail {
    pub id: String,
    pub student_name: String,
    pub roll: String,
    pub assignment_id: i64,
    pub assignment_title: String,
    pub status: String,
    pub submitted_on: String,
    pub text_response: Option<String>,
    pub plagiarism_score: f64,
}
