// src/main.rs
use axum::serve;
use classtrack::{db, state::AppState, web};
use std::{env, net::SocketAddr};
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging (tracing) ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                env::var("RUST_LOG")
                    .unwrap_or_else(|_| {
                        "classtrack=debug,tower_http=info,sqlx=warn,tower_sessions=info".into()
                    })
                    .into()
            }),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Starting classtrack server...");

    // --- Database ---
    let db_pool = match db::create_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Failed to initialize the database: {}", e);
            return Err(anyhow::anyhow!("Failed to connect/migrate DB: {}", e));
        }
    };

    // --- Sessions ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Failed to create session store: {}", e))?;
    session_store
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to migrate session store: {}", e))?;

    // Sweep expired sessions in the background
    let session_store_clone = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = session_store_clone
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Session cleanup task failed: {:?}", e);
        }
    });
    tracing::info!("🧹 Session cleanup task started.");

    // The signing key requires at least 64 bytes of secret
    let secret = env::var("SESSION_SECRET")
        .map_err(|e| anyhow::anyhow!("SESSION_SECRET environment variable not set: {}", e))?;
    if secret.len() < 64 {
        tracing::error!("❌ SESSION_SECRET must be at least 64 characters.");
        anyhow::bail!("SESSION_SECRET too short ({} chars, need 64)", secret.len());
    }
    let key = Key::from(secret.as_bytes());

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_signed(key);

    tracing::info!("🔑 Session layer configured.");

    // --- Application state ---
    let app_state = AppState { db_pool };

    // --- Listener ---
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    tracing::info!("📡 Server listening on http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Failed to bind {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // --- Router and middleware stack ---
    tracing::info!("🛠️ Building router and applying middlewares...");
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(session_layer),
    );
    tracing::info!("✅ Router and middlewares configured.");

    // --- Serve ---
    tracing::info!("👂 Server ready to accept connections...");
    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Fatal server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
