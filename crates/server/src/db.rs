use axum::extract::FromRef;
use shared_types::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::rate_limit::{self, RateLimitState};

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<PgPool>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub sync_limit: RateLimitState,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            sync_limit: rate_limit::sync_user_limiter().clone(),
        }
    }
}

/// Pool created lazily: no connections are opened until the first query,
/// so the pool is not tied to the runtime that happened to create it.
static POOL: OnceLock<Pool<Postgres>> = OnceLock::new();
static MIGRATED: AtomicBool = AtomicBool::new(false);

/// Create a new database connection pool from environment variables.
pub fn create_pool() -> Result<Pool<Postgres>, sqlx::Error> {
    crate::config::load_dotenv();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Get or initialize the process-wide pool used by Dioxus server functions.
/// Migrations run once on the first call.
///
/// REST handlers use `State<PgPool>` from `AppState` instead.
pub async fn get_db() -> Result<&'static Pool<Postgres>, AppError> {
    let pool = match POOL.get() {
        Some(pool) => pool,
        None => {
            let created = create_pool().map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                AppError::database("Database unavailable")
            })?;
            // Another caller may have won the race; either pool is fine.
            let _ = POOL.set(created);
            POOL.get().ok_or_else(|| AppError::internal("Database pool not initialized"))?
        }
    };

    if !MIGRATED.swap(true, Ordering::SeqCst) {
        if let Err(e) = run_migrations(pool).await {
            MIGRATED.store(false, Ordering::SeqCst);
            tracing::error!(error = %e, "Failed to run database migrations");
            return Err(AppError::database("Database migrations failed"));
        }
    }

    Ok(pool)
}
