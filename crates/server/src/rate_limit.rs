use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared_types::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use crate::auth::jwt::Claims;

/// Sliding window rate limit state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    inner: Arc<Mutex<RateLimitInner>>,
}

struct RateLimitInner {
    /// Map from client key -> request timestamps inside the window.
    requests: HashMap<String, Vec<Instant>>,
    max_requests: u32,
    window: Duration,
    /// Keys with no timestamps left are dropped at most once per window.
    last_sweep: Instant,
}

static SYNC_USER_LIMIT: OnceLock<RateLimitState> = OnceLock::new();

/// Process-wide provisioning limiter. The REST route and the `sync_user`
/// server function draw from the same budget.
pub fn sync_user_limiter() -> &'static RateLimitState {
    SYNC_USER_LIMIT.get_or_init(RateLimitState::for_sync_user)
}

/// Limiter key for a signed-in caller.
pub fn subject_key(sub: &str) -> String {
    format!("sub:{sub}")
}

impl RateLimitState {
    /// Create rate limiter allowing `max_requests` per `window`.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimitInner {
                requests: HashMap::new(),
                max_requests,
                window,
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Limiter for `POST /sync-user`: `SYNC_USER_RATE_LIMIT` calls per minute
    /// per client (default 10).
    pub fn for_sync_user() -> Self {
        let max = std::env::var("SYNC_USER_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        Self::new(max, Duration::from_secs(60))
    }

    /// Record a request from `key`. Returns false when the key is over its limit.
    pub fn check(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let window = inner.window;
        let max = inner.max_requests;

        if now.duration_since(inner.last_sweep) >= window {
            inner.requests.retain(|_, timestamps| {
                timestamps.retain(|t| now.duration_since(*t) < window);
                !timestamps.is_empty()
            });
            inner.last_sweep = now;
        }

        let timestamps = inner.requests.entry(key.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < window);

        if timestamps.len() as u32 >= max {
            return false;
        }

        timestamps.push(now);
        true
    }

    /// [`check`](Self::check) for callers outside the middleware, such as
    /// server functions.
    pub fn enforce(&self, key: &str) -> Result<(), AppError> {
        if self.check(key) {
            return Ok(());
        }
        tracing::warn!(client = %key, "Rate limit exceeded");
        Err(AppError::rate_limited("Rate limit exceeded. Please try again later."))
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).requests.len()
    }
}

/// Client key: the session subject when signed in, otherwise the first
/// `X-Forwarded-For` hop.
fn client_key(request: &Request) -> String {
    if let Some(claims) = request.extensions().get::<Claims>() {
        return subject_key(&claims.sub);
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| format!("ip:{}", ip.trim()))
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Axum middleware that enforces the limit per client key.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    if !state.check(&key) {
        tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        return AppError::rate_limited("Rate limit exceeded. Please try again later.")
            .into_response();
    }

    next.run(request).await
}
