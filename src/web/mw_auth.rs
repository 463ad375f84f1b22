// src/web/mw_auth.rs
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;

// Middleware that checks whether somebody is logged in
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<i64>("user_id").await {
        Ok(Some(user_id)) => {
            tracing::debug!("Auth MW: user {} authenticated, continuing...", user_id);

            // Hand the id to the protected handlers via request extensions
            request.extensions_mut().insert(UserId(user_id));

            Ok(next.run(request).await)
        }
        Ok(None) => {
            // No 'user_id' in the session, so nobody is logged in
            tracing::debug!("Auth MW: not authenticated, redirecting to /login");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            tracing::error!("Auth MW: failed to read session: {:?}", e);
            Err(AppError::SessionError(format!(
                "Failed to check session: {}",
                e
            )))
        }
    }
}

// Simple wrapper carrying the logged-in user's id through request extensions
#[derive(Clone, Debug)]
pub struct UserId(pub i64);
