use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the process start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the profile store is unreachable.
    pub status: String,
    /// `connected`, or the error from the profile count.
    pub db: String,
    /// Rows in `profiles`; absent when the count failed.
    pub profiles: Option<i64>,
    pub uptime_seconds: u64,
    pub version: String,
}

impl HealthResponse {
    fn from_count(count: Result<i64, String>) -> Self {
        let (status, db, profiles) = match count {
            Ok(count) => ("ok", "connected".to_string(), Some(count)),
            Err(e) => ("degraded", format!("error: {e}"), None),
        };
        Self {
            status: status.to_string(),
            db,
            profiles,
            uptime_seconds: START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness check. Always 200 so a store outage does not take the site
/// down; the outage shows up as `degraded`.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<Pool<Postgres>>) -> Json<HealthResponse> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Health check could not read profiles");
            e.to_string()
        });

    Json(HealthResponse::from_count(count))
}
