// Shared plumbing for the integration tests: an app wired exactly like
// main.rs (sessions included) on top of an in-memory SQLite database.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use classtrack::{state::AppState, web};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use time::Duration;
use tower::ServiceExt;
use tower_sessions::{cookie::Key, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

// 64 bytes, the minimum for a cookie signing key
const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-secret-test-secret-test-secret-0123";

/// Builds the full router over a fresh in-memory database with migrations
/// applied. One connection only: every pooled connection to `:memory:`
/// would otherwise be its own empty database.
pub async fn spawn_app() -> (Router, SqlitePool) {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .expect("failed to configure session store");
    session_store
        .migrate()
        .await
        .expect("failed to migrate session store");

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_signed(Key::from(TEST_SECRET));

    let app = web::routes::create_router(AppState {
        db_pool: db_pool.clone(),
    })
    .layer(session_layer);

    (app, db_pool)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    get_with_cookie(app, uri, None).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).expect("valid request"))
        .await
        .expect("request failed")
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    post_form_with_cookie(app, uri, body, None).await
}

pub async fn post_form_with_cookie(
    app: &Router,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    app.clone()
        .oneshot(
            builder
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
        .expect("request failed")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body was not utf-8")
}

/// The Location a redirect points at.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response carried no Location header")
        .to_str()
        .expect("Location was not utf-8")
        .to_string()
}

/// The session cookie set by a response, ready to send back.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).to_string())
}

/// Registers an account and logs it in, returning the session cookie.
pub async fn login_as(app: &Router, name: &str, email: &str, role: &str) -> String {
    let register_body = format!(
        "name={}&email={}&password=secret123&role={}",
        name, email, role
    );
    let response = post_form(app, "/register", &register_body).await;
    assert!(
        response.status().is_redirection(),
        "registration for {} did not redirect",
        email
    );

    let login_body = format!("email={}&password=secret123", email);
    let response = post_form(app, "/login", &login_body).await;
    session_cookie(&response).expect("login set no session cookie")
}
