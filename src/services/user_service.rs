// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
};
use sqlx::SqlitePool;

pub const DEFINED_ROLES: &[&str] = &["teacher", "student"];

/// Looks an account up by its email (the login identifier).
pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by email: {}", email);
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db_pool)
        .await?;

    if user.is_some() {
        tracing::debug!("User '{}' found.", email);
    } else {
        tracing::debug!("User '{}' not found.", email);
    }
    Ok(user)
}

pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: i64) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(user)
}

/// The stored role of an account, if the account exists.
pub async fn find_user_role(db_pool: &SqlitePool, user_id: i64) -> AppResult<Option<String>> {
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(role)
}

/// Creates an account with a bcrypt-hashed password and returns the fresh id.
pub async fn create_user(
    db_pool: &SqlitePool,
    name: &str,
    email: &str,
    raw_password: &str,
    role: &str,
) -> AppResult<i64> {
    tracing::info!("Trying to create user: {}", email);

    if !DEFINED_ROLES.iter().any(|&r| r == role) {
        return Err(AppError::Validation(
            "Role must be 'teacher' or 'student'.".to_string(),
        ));
    }

    // 1. Hash the password first (the slow part, outside any DB work)
    let password_hash = crate::services::auth_service::hash_password(raw_password).await?;

    // 2. Insert the account
    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .bind(role)
    .execute(db_pool)
    .await;

    // A duplicate email surfaces as a UNIQUE violation (SQLite codes 19/2067/1555)
    if let Err(sqlx::Error::Database(db_err)) = &result {
        if db_err
            .code()
            .map_or(false, |c| c == "19" || c == "2067" || c == "1555")
        {
            tracing::warn!("Rejected registration: email '{}' already in use.", email);
            return Err(AppError::Validation(
                "An account with that email already exists.".to_string(),
            ));
        }
    }
    let result = result?;

    tracing::info!("✅ User '{}' created.", email);
    Ok(result.last_insert_rowid())
}
