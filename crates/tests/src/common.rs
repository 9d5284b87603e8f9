use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use serde_json::Value;
use server::db::AppState;
use server::rate_limit::RateLimitState;
use shared_types::{Identity, Role};
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Secret the test router verifies session tokens with.
pub const TEST_SECRET: &str = "integration-test-session-secret";

/// Email that `ADMIN_EMAIL` points at during tests.
pub const OWNER_EMAIL: &str = "owner@printshop.test";

/// Tests share one database; each holds this lock while it truncates and runs.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

/// Build a test router backed by a real Postgres pool.
///
/// Returns `None` (and the test should return early) when neither
/// `TEST_DATABASE_URL` nor `DATABASE_URL` is set. The returned guard must be
/// held for the whole test.
pub async fn test_app() -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    test_app_rate_limited(1_000).await
}

/// Like [`test_app`], with `POST /sync-user` limited to `max` calls per minute.
pub async fn test_app_rate_limited(
    max: u32,
) -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();
    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("TEST_DATABASE_URL / DATABASE_URL not set, skipping database test");
        return None;
    };

    std::env::set_var("IDENTITY_JWT_SECRET", TEST_SECRET);
    // Set rather than removed so a `.env` issuer is not reloaded per request.
    std::env::set_var("IDENTITY_ISSUER", "");
    std::env::set_var("ADMIN_EMAIL", OWNER_EMAIL);

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    server::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE profiles")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    let state = AppState {
        pool: pool.clone(),
        sync_limit: RateLimitState::new(max, Duration::from_secs(60)),
    };
    let router = server::rest::api_router(state.sync_limit.clone())
        .layer(middleware::from_fn(
            server::auth::middleware::session_middleware,
        ))
        .with_state(state);

    Some((router, pool, guard))
}

/// Session token for `identity`, signed like the provider would.
pub fn token_for(id: &str, email: &str) -> String {
    server::auth::jwt::create_session_token(
        &Identity::new(id, email),
        TEST_SECRET,
        None,
        chrono::Duration::minutes(10),
    )
    .expect("Failed to sign test token")
}

/// Insert a profile directly, bypassing provisioning.
pub async fn seed_profile(pool: &Pool<Postgres>, id: &str, email: &str, role: Role) {
    sqlx::query("INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(email)
        .bind(role.as_str())
        .execute(pool)
        .await
        .expect("Failed to seed profile");
}

/// Role currently stored for `id`.
pub async fn stored_role(pool: &Pool<Postgres>, id: &str) -> Option<String> {
    sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .expect("Failed to read role")
}

/// Admin profile plus a token for it.
pub async fn seed_admin(pool: &Pool<Postgres>) -> String {
    seed_profile(pool, "user_admin", "admin@printshop.test", Role::Admin).await;
    token_for("user_admin", "admin@printshop.test")
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// GET, optionally with a Bearer session token.
pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, request("GET", uri, token, None)).await
}

/// POST without a body, optionally with a Bearer session token.
pub async fn post(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, request("POST", uri, token, None)).await
}

/// PUT JSON, optionally with a Bearer session token.
pub async fn put_json(
    app: &Router,
    uri: &str,
    body: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    send(app, request("PUT", uri, token, Some(body))).await
}

/// POST with the session in the `__session` cookie instead of a header.
pub async fn post_with_cookie(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("cookie", format!("__session={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// Send a request through the router and parse the JSON response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, body)
}
