// The public tracker page: three insert forms and the status board.
mod helpers;

use axum::http::StatusCode;
use helpers::{body_text, get, location, post_form, spawn_app};

#[tokio::test]
async fn add_student_creates_exactly_one_row() {
    let (app, db_pool) = spawn_app().await;

    let response = post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/?success="));

    let rows: Vec<(i64, String, String)> =
        sqlx::query_as("SELECT id, name, roll FROM students")
            .fetch_all(&db_pool)
            .await
            .unwrap();
    assert_eq!(rows.len(), 1);
    let (id, name, roll) = &rows[0];
    assert!(*id > 0);
    assert_eq!(name, "Alice");
    assert_eq!(roll, "R1");
}

#[tokio::test]
async fn add_assignment_stores_the_due_date() {
    let (app, db_pool) = spawn_app().await;

    let response = post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=desc&due=2024-01-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/?success="));

    let (title, due_date): (String, String) =
        sqlx::query_as("SELECT title, due_date FROM assignments")
            .fetch_one(&db_pool)
            .await
            .unwrap();
    assert_eq!(title, "HW1");
    assert_eq!(due_date, "2024-01-01");
}

#[tokio::test]
async fn add_assignment_rejects_a_garbage_date() {
    let (app, db_pool) = spawn_app().await;

    let response = post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=not-a-date",
    )
    .await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn submit_status_stamps_the_current_server_date() {
    let (app, db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;

    let response = post_form(
        &app,
        "/",
        "submit_status=1&student=1&assignment=1&status=Submitted",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/?success="));

    let (status, submitted_on): (String, String) =
        sqlx::query_as("SELECT status, submitted_on FROM submissions")
            .fetch_one(&db_pool)
            .await
            .unwrap();
    assert_eq!(status, "Submitted");
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    assert_eq!(submitted_on, today);
}

#[tokio::test]
async fn status_board_joins_names_and_titles() {
    let (app, _db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;
    post_form(
        &app,
        "/",
        "submit_status=1&student=1&assignment=1&status=Pending",
    )
    .await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("<td>Alice</td>"));
    assert!(html.contains("<td>HW1</td>"));
    assert!(html.contains("Pending"));
}

#[tokio::test]
async fn resubmitting_the_same_pair_appends_a_second_row() {
    let (app, db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;

    let body = "submit_status=1&student=1&assignment=1&status=Pending";
    post_form(&app, "/", body).await;
    post_form(&app, "/", body).await;

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM submissions WHERE student_id = 1 AND assignment_id = 1",
    )
    .fetch_one(&db_pool)
    .await
    .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn status_for_a_missing_student_is_rejected() {
    let (app, db_pool) = spawn_app().await;

    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;

    let response = post_form(
        &app,
        "/",
        "submit_status=1&student=999&assignment=1&status=Submitted",
    )
    .await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn status_for_a_missing_assignment_is_rejected() {
    let (app, db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;

    let response = post_form(
        &app,
        "/",
        "submit_status=1&student=1&assignment=42&status=Submitted",
    )
    .await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let (app, db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;

    let response = post_form(
        &app,
        "/",
        "submit_status=1&student=1&assignment=1&status=Graded",
    )
    .await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn duplicate_roll_is_rejected_with_a_flash() {
    let (app, db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    let response = post_form(&app, "/", "add_student=1&name=Bob&roll=R1").await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn blank_student_fields_are_rejected() {
    let (app, db_pool) = spawn_app().await;

    let response = post_form(&app, "/", "add_student=1&name=+++&roll=").await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn posting_several_actions_at_once_inserts_nothing() {
    let (app, db_pool) = spawn_app().await;

    let response = post_form(
        &app,
        "/",
        "add_student=1&name=Alice&roll=R1&add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;
    assert!(location(&response).starts_with("/?error="));

    let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    let assignments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(students, 0);
    assert_eq!(assignments, 0);
}

#[tokio::test]
async fn posting_no_action_at_all_inserts_nothing() {
    let (app, db_pool) = spawn_app().await;

    let response = post_form(&app, "/", "name=Alice&roll=R1").await;
    assert!(location(&response).starts_with("/?error="));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn dropdowns_list_every_student_and_assignment() {
    let (app, _db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    post_form(&app, "/", "add_student=1&name=Bob&roll=R2").await;
    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains(r#"<option value="1">Alice (R1)</option>"#));
    assert!(html.contains(r#"<option value="2">Bob (R2)</option>"#));
    assert!(html.contains(r#"<option value="1">HW1</option>"#));
}

#[tokio::test]
async fn flash_message_from_the_redirect_is_rendered() {
    let (app, _db_pool) = spawn_app().await;

    let response = post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    let target = location(&response);
    let html = body_text(get(&app, &target).await).await;
    assert!(html.contains("Student &#39;Alice&#39; added.") || html.contains("Student 'Alice' added."));
}

#[tokio::test]
async fn page_carries_the_theme_toggle_and_script() {
    let (app, _db_pool) = spawn_app().await;

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains(r#"id="theme-toggle""#));
    assert!(html.contains("/assets/theme.js"));
}

#[tokio::test]
async fn text_answer_gets_a_similarity_score_against_earlier_answers() {
    let (app, db_pool) = spawn_app().await;

    post_form(&app, "/", "add_student=1&name=Alice&roll=R1").await;
    post_form(&app, "/", "add_student=1&name=Bob&roll=R2").await;
    post_form(
        &app,
        "/",
        "add_assignment=1&title=HW1&desc=&due=2024-01-01",
    )
    .await;

    post_form(
        &app,
        "/",
        "submit_status=1&student=1&assignment=1&status=Submitted&text=the+quick+brown+fox",
    )
    .await;
    post_form(
        &app,
        "/",
        "submit_status=1&student=2&assignment=1&status=Submitted&text=the+quick+brown+fox",
    )
    .await;

    let scores: Vec<f64> = sqlx::query_scalar(
        "SELECT plagiarism_score FROM submissions WHERE assignment_id = 1 ORDER BY plagiarism_score",
    )
    .fetch_all(&db_pool)
    .await
    .unwrap();
    // First answer had nothing to match against; the copy scores 100
    assert_eq!(scores, vec![0.0, 100.0]);
}
