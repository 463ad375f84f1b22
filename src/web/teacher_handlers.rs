// src/web/teacher_handlers.rs
use crate::{
    error::{AppError, AppResult},
    services::{
        assignment_service, feedback_service, student_service, submission_service, user_service,
    },
    state::AppState,
    templates::{
        AssignmentDetailPage, ReportLine, ReviewSubmissionPage, StudentReportPage,
        TeacherDashboardPage,
    },
    web::mw_auth::UserId,
};
use askama::Template;
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use urlencoding;

// --- Form structs ---

#[derive(Deserialize, Debug)]
pub struct FlashParams {
    success: Option<String>,
    error: Option<String>,
}

// Numbers come in as text so a bad value flashes instead of failing extraction
#[derive(Deserialize, Debug)]
pub struct ReviewForm {
    score: String,
    max_score: String,
    rubric_clarity: String,
    rubric_completion: String,
    rubric_presentation: String,
    comments: Option<String>,
}

fn review_redirect(submission_id: &str, error: &str) -> Redirect {
    let error_msg = urlencoding::encode(error).to_string();
    let redirect_url = format!("/teacher/submissions/{}/review?error={}", submission_id, error_msg);
    Redirect::to(&redirect_url)
}

// --- Handlers ---

/// Handler for GET /teacher/dashboard
pub async fn show_dashboard(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let user_id = user_id_ext.0;
    tracing::debug!("GET /teacher/dashboard: access for user {}", user_id);

    let user = user_service::find_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or_else(|| {
            // An authenticated id that no longer exists in the DB
            tracing::error!("CRITICAL: authenticated user_id {} not found in DB!", user_id);
            AppError::InternalServerError
        })?;

    let total_submissions = submission_service::count_submissions(&state.db_pool).await?;
    let graded = feedback_service::count_graded(&state.db_pool).await?;
    let pending = total_submissions - graded;
    let assignments = assignment_service::list_with_submission_counts(&state.db_pool).await?;
    let students = student_service::find_all_students(&state.db_pool).await?;

    let template = TeacherDashboardPage {
        user_name: user.name,
        total_submissions,
        graded,
        pending,
        assignments,
        students,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render TeacherDashboardPage template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// Handler for GET /teacher/assignments/{id}
pub async fn show_assignment_detail(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
    Query(params): Query<FlashParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /teacher/assignments/{}", assignment_id);

    let assignment = assignment_service::find_assignment_by_id(&state.db_pool, assignment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found.".to_string()))?;

    let submissions =
        submission_service::submissions_for_assignment(&state.db_pool, assignment_id).await?;

    let template = AssignmentDetailPage {
        assignment,
        submissions,
        success_message: params.success,
        error_message: params.error,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render AssignmentDetailPage template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// Handler for GET /teacher/submissions/{id}/review
pub async fn show_review_form(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
    Query(params): Query<FlashParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /teacher/submissions/{}/review", submission_id);

    let submission = submission_service::find_submission_detail(&state.db_pool, &submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found.".to_string()))?;

    // Earlier feedback prefills the form so a second review edits in place
    let feedback =
        feedback_service::find_feedback_for_submission(&state.db_pool, &submission.id).await?;

    let template = ReviewSubmissionPage {
        submission,
        feedback,
        error_message: params.error,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render ReviewSubmissionPage template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// Handler for POST /teacher/submissions/{id}/review
pub async fn handle_review(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(submission_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    let teacher_id = user_id_ext.0;
    tracing::info!(
        "POST /teacher/submissions/{}/review by user {}",
        submission_id,
        teacher_id
    );

    // Needed for the redirect target, and 404s early for unknown ids
    let detail = submission_service::find_submission_detail(&state.db_pool, &submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found.".to_string()))?;

    let score = match form.score.trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => return Ok(review_redirect(&submission_id, "Score must be a number.")),
    };
    let max_score = match form.max_score.trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => return Ok(review_redirect(&submission_id, "Max score must be a number.")),
    };
    let rubric_clarity = match form.rubric_clarity.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            return Ok(review_redirect(
                &submission_id,
                "Rubric ratings must be whole numbers.",
            ))
        }
    };
    let rubric_completion = match form.rubric_completion.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            return Ok(review_redirect(
                &submission_id,
                "Rubric ratings must be whole numbers.",
            ))
        }
    };
    let rubric_presentation = match form.rubric_presentation.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            return Ok(review_redirect(
                &submission_id,
                "Rubric ratings must be whole numbers.",
            ))
        }
    };

    let comments = form.comments.as_deref().map(str::trim).filter(|c| !c.is_empty());

    match feedback_service::upsert_feedback(
        &state.db_pool,
        &submission_id,
        teacher_id,
        score,
        max_score,
        rubric_clarity,
        rubric_completion,
        rubric_presentation,
        comments,
    )
    .await
    {
        Ok(()) => {
            let success_msg = urlencoding::encode(&format!(
                "Feedback saved for {}.",
                detail.student_name
            ))
            .to_string();
            let redirect_url = format!(
                "/teacher/assignments/{}?success={}",
                detail.assignment_id, success_msg
            );
            Ok(Redirect::to(&redirect_url))
        }
        Err(AppError::Validation(msg)) => Ok(review_redirect(&submission_id, &msg)),
        Err(e) => {
            tracing::error!("Failed to save feedback for {}: {:?}", submission_id, e);
            Ok(review_redirect(&submission_id, "Could not save the feedback."))
        }
    }
}

/// Handler for GET /teacher/students/{id}/report
pub async fn show_student_report(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /teacher/students/{}/report", student_id);

    let student = student_service::find_student_by_id(&state.db_pool, student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))?;

    let rows = feedback_service::student_report(&state.db_pool, student_id).await?;
    let overall = feedback_service::overall_percent(&rows);

    let lines: Vec<ReportLine> = rows
        .into_iter()
        .map(|r| {
            let percent = feedback_service::percent_of(r.score, r.max_score);
            ReportLine {
                assignment_title: r.assignment_title,
                submitted_on: r.submitted_on,
                score: r.score,
                max_score: r.max_score,
                percent,
            }
        })
        .collect();

    let template = StudentReportPage {
        student: &student,
        lines: &lines,
        overall,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render StudentReportPage template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}
