// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, mw_auth, mw_teacher, teacher_handlers, tracker_handlers},
};
use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

pub fn create_router(app_state: AppState) -> Router {
    // --- Public routes ---
    // The tracker page itself needs no login: reads and inserts both
    let public_routes = Router::new()
        .route(
            "/",
            get(tracker_handlers::show_tracker_page).post(tracker_handlers::handle_tracker_post),
        )
        .route(
            "/login",
            get(auth_handlers::show_login_form).post(auth_handlers::handle_login),
        )
        .route(
            "/register",
            get(auth_handlers::show_register_form).post(auth_handlers::handle_register),
        )
        .route("/logout", get(auth_handlers::handle_logout));

    // --- Teacher routes ---
    // Need login AND the teacher role
    let teacher_routes = Router::new()
        .route("/dashboard", get(teacher_handlers::show_dashboard))
        .route(
            "/assignments/{id}",
            get(teacher_handlers::show_assignment_detail),
        )
        .route(
            "/submissions/{id}/review",
            get(teacher_handlers::show_review_form).post(teacher_handlers::handle_review),
        )
        .route(
            "/students/{id}/report",
            get(teacher_handlers::show_student_report),
        )
        // Only mw_teacher here (mw_auth is applied by the parent router)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_teacher::require_teacher,
        ));

    // --- Authenticated routes ---
    let authenticated_routes = Router::new()
        .nest("/teacher", teacher_routes)
        // require_auth covers everything nested above
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Final router ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .nest_service("/assets", ServeDir::new("assets"))
        .with_state(app_state)
}
