// src/web/mw_teacher.rs
use crate::{
    error::AppError,
    services::user_service,
    state::AppState,
    web::mw_auth::UserId,
};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};

/// Middleware that checks whether the logged-in user is a teacher.
/// Must run *after* the `require_auth` middleware.
pub async fn require_teacher(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = user_id_ext.0;
    tracing::debug!("Teacher MW: checking role for user {}", user_id);

    // The role is read from the database, not trusted from the session
    match user_service::find_user_role(&state.db_pool, user_id).await {
        Ok(Some(role)) if role == "teacher" => {
            tracing::debug!("Teacher MW: access granted for user {}", user_id);
            Ok(next.run(request).await)
        }
        Ok(_) => {
            tracing::warn!("Teacher MW: access denied for user {} (not a teacher).", user_id);
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            tracing::error!("Teacher MW: failed to look up role for {}: {:?}", user_id, e);
            Err(e)
        }
    }
}
