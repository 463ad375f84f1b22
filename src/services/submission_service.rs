// src/services/submission_service.rs
use crate::{
    error::{AppError, AppResult},
    models::submission::{AssignmentSubmissionRow, StatusRow, SubmissionDetail, SubmissionStatus},
};
use sqlx::SqlitePool;
use std::collections::HashSet;
use uuid::Uuid;

// --- Tracker writes ---

/// Records a status for a (student, assignment) pair. Repeated posts for the
/// same pair append new rows; existing rows are never rewritten.
pub async fn create_submission(
    db_pool: &SqlitePool,
    student_id: i64,
    assignment_id: i64,
    status: SubmissionStatus,
    text_response: Option<&str>,
) -> AppResult<String> {
    // Both referenced rows must still exist; the form dropdowns can go stale
    // between page load and post.
    let student_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = ?)")
            .bind(student_id)
            .fetch_one(db_pool)
            .await?;
    if !student_exists {
        return Err(AppError::Validation(
            "Selected student no longer exists.".to_string(),
        ));
    }

    let assignment_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM assignments WHERE id = ?)")
            .bind(assignment_id)
            .fetch_one(db_pool)
            .await?;
    if !assignment_exists {
        return Err(AppError::Validation(
            "Selected assignment no longer exists.".to_string(),
        ));
    }

    // Similarity is scored against the answers already on file for this
    // assignment, before the new row lands.
    let plagiarism = match text_response {
        Some(text) => {
            let others: Vec<String> = sqlx::query_scalar(
                "SELECT text_response FROM submissions WHERE assignment_id = ? AND text_response IS NOT NULL",
            )
            .bind(assignment_id)
            .fetch_all(db_pool)
            .await?;
            plagiarism_score(text, &others)
        }
        None => 0.0,
    };

    let id = Uuid::new_v4().to_string();
    let submitted_on = chrono::Local::now().format("%Y-%m-%d").to_string();

    sqlx::query(
        r#"
        INSERT INTO submissions (id, student_id, assignment_id, status, submitted_on, text_response, plagiarism_score)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(student_id)
    .bind(assignment_id)
    .bind(status.as_str())
    .bind(&submitted_on)
    .bind(text_response)
    .bind(plagiarism)
    .execute(db_pool)
    .await?;

    tracing::info!(
        "✅ Submission {} recorded ({} on {}).",
        id,
        status.as_str(),
        submitted_on
    );
    Ok(id)
}

// --- Read side ---

/// The tracker status board: one line per submission, joined to names and
/// titles. No ORDER BY, the page shows bare table order.
pub async fn status_board(db_pool: &SqlitePool) -> AppResult<Vec<StatusRow>> {
    let rows = sqlx::query_as::<_, StatusRow>(
        r#"
        SELECT st.name AS student_name, a.title AS assignment_title, s.status, s.submitted_on
        FROM submissions s
        JOIN students st ON s.student_id = st.id
        JOIN assignments a ON s.assignment_id = a.id
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

/// All submissions for one assignment, newest first. 'graded' comes from the
/// feedback table, not from the submission row.
pub async fn submissions_for_assignment(
    db_pool: &SqlitePool,
    assignment_id: i64,
) -> AppResult<Vec<AssignmentSubmissionRow>> {
    let rows = sqlx::query_as::<_, AssignmentSubmissionRow>(
        r#"
        SELECT s.id, st.name AS student_name, st.roll, s.status, s.submitted_on,
               s.plagiarism_score, f.id IS NOT NULL AS graded
        FROM submissions s
        JOIN students st ON s.student_id = st.id
        LEFT JOIN feedback f ON f.submission_id = s.id
        WHERE s.assignment_id = ?
        ORDER BY s.submitted_on DESC, s.id
        "#,
    )
    .bind(assignment_id)
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

pub async fn find_submission_detail(
    db_pool: &SqlitePool,
    submission_id: &str,
) -> AppResult<Option<SubmissionDetail>> {
    let detail = sqlx::query_as::<_, SubmissionDetail>(
        r#"
        SELECT s.id, st.name AS student_name, st.roll, s.assignment_id,
               a.title AS assignment_title, s.status, s.submitted_on,
               s.text_response, s.plagiarism_score
        FROM submissions s
        JOIN students st ON s.student_id = st.id
        JOIN assignments a ON s.assignment_id = a.id
        WHERE s.id = ?
        "#,
    )
    .bind(submission_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(detail)
}

pub async fn count_submissions(db_pool: &SqlitePool) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

// --- Similarity scoring ---

/// Highest word-overlap (Jaccard) similarity between `text` and any of the
/// other answers, as a percentage rounded to two decimals.
pub fn plagiarism_score(text: &str, others: &[String]) -> f64 {
    let words: HashSet<String> = text.split_whitespace().map(|w| w.to_lowercase()).collect();
    if words.is_empty() || others.is_empty() {
        return 0.0;
    }

    let mut max_similarity: f64 = 0.0;
    for other in others {
        let other_words: HashSet<String> =
            other.split_whitespace().map(|w| w.to_lowercase()).collect();
        if other_words.is_empty() {
            continue;
        }
        let intersection = words.intersection(&other_words).count() as f64;
        let union = words.union(&other_words).count() as f64;
        max_similarity = max_similarity.max(intersection / union);
    }

    let pct = max_similarity * 100.0;
    (pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::plagiarism_score;

    #[test]
    fn identical_answers_score_one_hundred() {
        let others = vec!["the quick brown fox".to_string()];
        assert_eq!(plagiarism_score("the quick brown fox", &others), 100.0);
    }

    #[test]
    fn case_is_ignored() {
        let others = vec!["Hello World".to_string()];
        assert_eq!(plagiarism_score("hello world", &others), 100.0);
    }

    #[test]
    fn disjoint_answers_score_zero() {
        let others = vec!["completely different words".to_string()];
        assert_eq!(plagiarism_score("nothing shared here", &others), 0.0);
    }

    #[test]
    fn empty_text_scores_zero() {
        let others = vec!["anything".to_string()];
        assert_eq!(plagiarism_score("", &others), 0.0);
        assert_eq!(plagiarism_score("   ", &others), 0.0);
    }

    #[test]
    fn no_other_answers_scores_zero() {
        assert_eq!(plagiarism_score("first answer ever", &[]), 0.0);
    }

    #[test]
    fn partial_overlap_is_jaccard_of_word_sets() {
        // {the, quick, brown, fox} vs {the, quick, red, fox}: 3 shared of 5 total
        let others = vec!["the quick red fox".to_string()];
        assert_eq!(plagiarism_score("the quick brown fox", &others), 60.0);
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        // {a} vs {a, b, c}: 1/3 -> 33.33
        let others = vec!["a b c".to_string()];
        assert_eq!(plagiarism_score("a", &others), 33.33);
    }

    #[test]
    fn highest_similarity_wins() {
        let others = vec![
            "unrelated text".to_string(),
            "the quick red fox".to_string(),
            "the quick brown fox".to_string(),
        ];
        assert_eq!(plagiarism_score("the quick brown fox", &others), 100.0);
    }

    #[test]
    fn repeated_words_count_once() {
        // Word sets, not word counts: "fox fox fox" is just {fox}
        let others = vec!["fox".to_string()];
        assert_eq!(plagiarism_score("fox fox fox", &others), 100.0);
    }
}
