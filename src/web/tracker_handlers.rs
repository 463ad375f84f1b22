// src/web/tracker_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::submission::SubmissionStatus,
    services::{assignment_service, student_service, submission_service},
    state::AppState,
    templates::IndexPage,
};
use askama::Template;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use urlencoding;

// --- Form structs ---

// One struct covers the whole page: each of the three HTML forms posts its
// own marker field, everything outside that form arrives as None. Numeric
// fields come in as text so a bad value flashes instead of failing extraction.
#[derive(Deserialize, Debug)]
pub struct TrackerForm {
    // "Add Student"
    add_student: Option<String>,
    name: Option<String>,
    roll: Option<String>,
    // "Add Assignment"
    add_assignment: Option<String>,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    // "Submit Assignment Status"
    submit_status: Option<String>,
    student: Option<String>,
    assignment: Option<String>,
    status: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct FlashParams {
    success: Option<String>,
    error: Option<String>,
}

// --- Handlers ---

/// Handler for GET / - the tracker page
pub async fn show_tracker_page(
    State(state): State<AppState>,
    Query(params): Query<FlashParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /: Loading tracker page...");

    // The page always renders all three datasets, empty or not
    let students = student_service::find_all_students(&state.db_pool).await?;
    let assignments = assignment_service::find_all_assignments(&state.db_pool).await?;
    let rows = submission_service::status_board(&state.db_pool).await?;

    let template = IndexPage {
        students,
        assignments,
        rows,
        success_message: params.success,
        error_message: params.error,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render IndexPage template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// Handler for POST / - dispatches on the marker field, then redirects back
/// to / with a flash message either way (Post/Redirect/Get).
pub async fn handle_tracker_post(
    State(state): State<AppState>,
    Form(form): Form<TrackerForm>,
) -> AppResult<Redirect> {
    // Exactly one marker per request; zero or several means the page was not
    // submitted through one of its forms.
    let marker_count = [
        form.add_student.is_some(),
        form.add_assignment.is_some(),
        form.submit_status.is_some(),
    ]
    .iter()
    .filter(|&&m| m)
    .count();

    if marker_count != 1 {
        tracing::warn!("POST /: request named {} actions.", marker_count);
        let error_msg = urlencoding::encode("Request must name exactly one action.");
        let redirect_url = format!("/?error={}", error_msg);
        return Ok(Redirect::to(&redirect_url));
    }

    if form.add_student.is_some() {
        // --- Add Student ---
        let name = form.name.as_deref().map(str::trim).unwrap_or_default();
        let roll = form.roll.as_deref().map(str::trim).unwrap_or_default();

        if name.is_empty() || roll.is_empty() {
            let error_msg = urlencoding::encode("Name and roll number are both required.");
            let redirect_url = format!("/?error={}", error_msg);
            return Ok(Redirect::to(&redirect_url));
        }

        return match student_service::create_student(&state.db_pool, name, roll).await {
            Ok(_) => {
                let success_msg =
                    urlencoding::encode(&format!("Student '{}' added.", name)).to_string();
                let redirect_url = format!("/?success={}", success_msg);
                Ok(Redirect::to(&redirect_url))
            }
            Err(e) => {
                tracing::error!("Failed to add student '{}': {:?}", name, e);
                let detail = match e {
                    AppError::Validation(msg) => msg,
                    _ => "Could not save the student record.".to_string(),
                };
                let error_msg = urlencoding::encode(&detail).to_string();
                let redirect_url = format!("/?error={}", error_msg);
                Ok(Redirect::to(&redirect_url))
            }
        };
    }

    if form.add_assignment.is_some() {
        // --- Add Assignment ---
        let title = form.title.as_deref().map(str::trim).unwrap_or_default();
        let description = form.desc.as_deref().map(str::trim).unwrap_or_default();
        let due_date = form.due.as_deref().map(str::trim).unwrap_or_default();

        if title.is_empty() || due_date.is_empty() {
            let error_msg = urlencoding::encode("Title and due date are both required.");
            let redirect_url = format!("/?error={}", error_msg);
            return Ok(Redirect::to(&redirect_url));
        }

        return match assignment_service::create_assignment(&state.db_pool, title, description, due_date)
            .await
        {
            Ok(_) => {
                let success_msg =
                    urlencoding::encode(&format!("Assignment '{}' added.", title)).to_string();
                let redirect_url = format!("/?success={}", success_msg);
                Ok(Redirect::to(&redirect_url))
            }
            Err(e) => {
                tracing::error!("Failed to add assignment '{}': {:?}", title, e);
                let detail = match e {
                    AppError::Validation(msg) => msg,
                    _ => "Could not save the assignment record.".to_string(),
                };
                let error_msg = urlencoding::encode(&detail).to_string();
                let redirect_url = format!("/?error={}", error_msg);
                Ok(Redirect::to(&redirect_url))
            }
        };
    }

    // --- Submit Assignment Status ---
    let student_id = match form
        .student
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
    {
        Some(id) => id,
        None => {
            let error_msg = urlencoding::encode("Select a valid student.");
            let redirect_url = format!("/?error={}", error_msg);
            return Ok(Redirect::to(&redirect_url));
        }
    };

    let assignment_id = match form
        .assignment
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
    {
        Some(id) => id,
        None => {
            let error_msg = urlencoding::encode("Select a valid assignment.");
            let redirect_url = format!("/?error={}", error_msg);
            return Ok(Redirect::to(&redirect_url));
        }
    };

    let status = match form.status.as_deref().and_then(SubmissionStatus::parse) {
        Some(s) => s,
        None => {
            let error_msg = urlencoding::encode("Status must be 'Submitted' or 'Pending'.");
            let redirect_url = format!("/?error={}", error_msg);
            return Ok(Redirect::to(&redirect_url));
        }
    };

    // An empty textarea counts as no answer at all
    let text_response = form
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match submission_service::create_submission(
        &state.db_pool,
        student_id,
        assignment_id,
        status,
        text_response,
    )
    .await
    {
        Ok(_) => {
            let success_msg = urlencoding::encode("Status recorded.");
            let redirect_url = format!("/?success={}", success_msg);
            Ok(Redirect::to(&redirect_url))
        }
        Err(e) => {
            tracing::error!(
                "Failed to record status for student {} / assignment {}: {:?}",
                student_id,
                assignment_id,
                e
            );
            let detail = match e {
                AppError::Validation(msg) => msg,
                _ => "Could not save the status record.".to_string(),
            };
            let error_msg = urlencoding::encode(&detail).to_string();
            let redirect_url = format!("/?error={}", error_msg);
            Ok(Redirect::to(&redirect_url))
        }
    }
}
