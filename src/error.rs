// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("password processing failed")]
    PasswordHashingError,

    #[error("session error: {0}")]
    SessionError(String),

    // Message is written for the user, never raw database detail.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("unexpected internal error")]
    InternalServerError,

    #[error("not authorized")]
    Unauthorized,
}

// How an AppError becomes an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Full detail goes to the server log only
        tracing::error!("request failed: {:?}", self);

        let (status, user_message) = match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not access the data store.".to_string(),
            ),
            AppError::EnvVarError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error.".to_string(),
            ),
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not process credentials.".to_string(),
            ),
            AppError::SessionError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong with your session.".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized => (
                StatusCode::FORBIDDEN,
                "You do not have permission to view this page.".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred.".to_string(),
            ),
        };

        (
            status,
            Html(format!(
                r#"
            <!DOCTYPE html><html><head><title>Error</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Error {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Go back</a></body></html>
         "#,
                status_code = status.as_u16(),
                message = user_message
            )),
        )
            .into_response()
    }
}

// Default Result type for the app
pub type AppResult<T = ()> = Result<T, AppError>;
