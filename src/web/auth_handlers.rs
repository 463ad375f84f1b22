// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginForm, RegisterForm},
    services::{auth_service, user_service},
    state::AppState,
    templates::{LoginPage, RegisterPage},
};
use askama::Template;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use urlencoding;

#[derive(Deserialize, Debug)]
pub struct LoginParams {
    success: Option<String>,
}

// Where each role lands after logging in
fn home_for_role(role: &str) -> &'static str {
    if role == "teacher" {
        "/teacher/dashboard"
    } else {
        "/"
    }
}

// GET /login
pub async fn show_login_form(session: Session, Query(params): Query<LoginParams>) -> impl IntoResponse {
    // Already logged in? Go straight to the role's home page.
    if let Ok(Some(role)) = session.get::<String>("role").await {
        tracing::debug!("GET /login: already logged in, redirecting");
        return Redirect::to(home_for_role(&role)).into_response();
    }

    let template = LoginPage {
        error: None,
        success: params.success,
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render login template: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load the page.",
            )
                .into_response()
        }
    }
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Login attempt for: {}", form.email);

    // 1. Look the account up by email
    match user_service::find_user_by_email(&state.db_pool, &form.email).await {
        Ok(Some(user)) => {
            tracing::debug!("User {} found, verifying password...", form.email);
            // 2. Check the password against the stored hash
            match auth_service::verify_password(&form.password, &user.password_hash).await {
                Ok(true) => {
                    // 3. Authenticate the session under a fresh id
                    session
                        .cycle_id()
                        .await
                        .map_err(|e| AppError::SessionError(format!("Failed to cycle id: {}", e)))?;
                    session
                        .insert("user_id", user.id)
                        .await
                        .map_err(|e| AppError::SessionError(format!("Failed to store session: {}", e)))?;
                    session
                        .insert("user_name", &user.name)
                        .await
                        .map_err(|e| AppError::SessionError(format!("Failed to store session: {}", e)))?;
                    session
                        .insert("role", &user.role)
                        .await
                        .map_err(|e| AppError::SessionError(format!("Failed to store session: {}", e)))?;

                    tracing::info!("✅ Login succeeded for: {}", user.email);
                    // 4. Send each role to its home page
                    Ok(Redirect::to(home_for_role(&user.role)).into_response())
                }
                Ok(false) => {
                    tracing::warn!("Wrong password for: {}", form.email);
                    // Render the login page again with a generic message
                    let template = LoginPage {
                        error: Some("Invalid email or password.".to_string()),
                        success: None,
                    };
                    match template.render() {
                        Ok(html) => Ok(Html(html).into_response()),
                        Err(e) => {
                            tracing::error!("Failed to render login template with error: {}", e);
                            Err(AppError::InternalServerError)
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to verify password for {}: {:?}", form.email, e);
                    Err(e)
                }
            }
        }
        Ok(None) => {
            tracing::warn!("Unknown login email: {}", form.email);
            // Same message as a wrong password, nothing leaks about accounts
            let template = LoginPage {
                error: Some("Invalid email or password.".to_string()),
                success: None,
            };
            match template.render() {
                Ok(html) => Ok(Html(html).into_response()),
                Err(e) => {
                    tracing::error!("Failed to render login template with error: {}", e);
                    Err(AppError::InternalServerError)
                }
            }
        }
        Err(e) => {
            tracing::error!("Failed to look up user {}: {:?}", form.email, e);
            Err(e)
        }
    }
}

// GET /register
pub async fn show_register_form(session: Session) -> impl IntoResponse {
    if let Ok(Some(role)) = session.get::<String>("role").await {
        tracing::debug!("GET /register: already logged in, redirecting");
        return Redirect::to(home_for_role(&role)).into_response();
    }

    let template = RegisterPage { error: None };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render register template: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load the page.",
            )
                .into_response()
        }
    }
}

// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Registration attempt for: {}", form.email);

    // Form-level checks before touching the database
    let name = form.name.trim();
    let email = form.email.trim();
    if name.is_empty() || email.is_empty() {
        return render_register_error("Name and email are both required.");
    }
    if !email.contains('@') {
        return render_register_error("Enter a valid email address.");
    }
    if form.password.len() < 6 {
        return render_register_error("Password must be at least 6 characters.");
    }

    match user_service::create_user(&state.db_pool, name, email, &form.password, &form.role).await {
        Ok(_) => {
            let success_msg = urlencoding::encode("Registration successful! Please log in.");
            let redirect_url = format!("/login?success={}", success_msg);
            Ok(Redirect::to(&redirect_url).into_response())
        }
        Err(e) => {
            tracing::warn!("Registration failed for {}: {:?}", email, e);
            let detail = match e {
                AppError::Validation(msg) => msg,
                _ => "Could not create the account.".to_string(),
            };
            render_register_error(&detail)
        }
    }
}

fn render_register_error(message: &str) -> AppResult<axum::response::Response> {
    let template = RegisterPage {
        error: Some(message.to_string()),
    };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Failed to render register template with error: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let user_id: Option<i64> = session.get("user_id").await.ok().flatten();

    // Drops every value stored for this session
    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to delete session: {}", e)))?;

    if let Some(id) = user_id {
        tracing::info!("🚪 User {} logged out.", id);
    } else {
        tracing::info!("🚪 Anonymous session closed.");
    }

    Ok(Redirect::to("/login"))
}
