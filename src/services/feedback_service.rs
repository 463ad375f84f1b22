// src/services/feedback_service.rs
use crate::{
    error::{AppError, AppResult},
    models::feedback::{Feedback, ReportRow},
};
use sqlx::SqlitePool;

/// Saves rubric feedback for a submission. One feedback row per submission:
/// reviewing again replaces the previous scores, the submission row itself is
/// left untouched.
pub async fn upsert_feedback(
    db_pool: &SqlitePool,
    submission_id: &str,
    teacher_id: i64,
    score: f64,
    max_score: f64,
    rubric_clarity: i64,
    rubric_completion: i64,
    rubric_presentation: i64,
    comments: Option<&str>,
) -> AppResult<()> {
    if max_score <= 0.0 {
        return Err(AppError::Validation(
            "Max score must be greater than zero.".to_string(),
        ));
    }
    if score < 0.0 || score > max_score {
        return Err(AppError::Validation(
            "Score must be between 0 and the max score.".to_string(),
        ));
    }
    for rating in [rubric_clarity, rubric_completion, rubric_presentation] {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "Rubric ratings must be between 1 and 5.".to_string(),
            ));
        }
    }

    // The existence check and the write land atomically
    let mut tx = db_pool.begin().await?;

    let submission_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submissions WHERE id = ?)")
            .bind(submission_id)
            .fetch_one(&mut *tx)
            .await?;
    if !submission_exists {
        return Err(AppError::NotFound("Submission not found.".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO feedback (submission_id, teacher_id, score, max_score,
                              rubric_clarity, rubric_completion, rubric_presentation, comments)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(submission_id) DO UPDATE SET
           teacher_id = excluded.teacher_id,
           score = excluded.score,
           max_score = excluded.max_score,
           rubric_clarity = excluded.rubric_clarity,
           rubric_completion = excluded.rubric_completion,
           rubric_presentation = excluded.rubric_presentation,
           comments = excluded.comments
        "#,
    )
    .bind(submission_id)
    .bind(teacher_id)
    .bind(score)
    .bind(max_score)
    .bind(rubric_clarity)
    .bind(rubric_completion)
    .bind(rubric_presentation)
    .bind(comments)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("✅ Feedback saved for submission {}.", submission_id);
    Ok(())
}

pub async fn find_feedback_for_submission(
    db_pool: &SqlitePool,
    submission_id: &str,
) -> AppResult<Option<Feedback>> {
    let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE submission_id = ?")
        .bind(submission_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(feedback)
}

/// Graded submissions carry exactly one feedback row each.
pub async fn count_graded(db_pool: &SqlitePool) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

/// The graded work of one student, oldest submission first.
pub async fn student_report(db_pool: &SqlitePool, student_id: i64) -> AppResult<Vec<ReportRow>> {
    let rows = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT a.title AS assignment_title, s.submitted_on, f.score, f.max_score
        FROM feedback f
        JOIN submissions s ON f.submission_id = s.id
        JOIN assignments a ON s.assignment_id = a.id
        WHERE s.student_id = ?
        ORDER BY s.submitted_on, s.id
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

// --- Report math ---

/// Score as a percentage of max, rounded to two decimals. A zero or missing
/// max scores as zero rather than dividing by it.
pub fn percent_of(score: f64, max_score: f64) -> f64 {
    if max_score <= 0.0 {
        return 0.0;
    }
    let pct = score / max_score * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Overall percentage across graded rows: total points earned over total
/// points possible (weighted, not a mean of per-row percentages).
pub fn overall_percent(rows: &[ReportRow]) -> f64 {
    let total: f64 = rows.iter().map(|r| r.score).sum();
    let possible: f64 = rows.iter().map(|r| r.max_score).sum();
    percent_of(total, possible)
}
