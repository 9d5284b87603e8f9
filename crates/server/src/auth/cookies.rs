use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;
use std::sync::{Arc, Mutex};

/// Cookie the identity provider stores its session token in.
pub const SESSION_COOKIE: &str = "__session";

fn cookie_secure() -> bool {
    std::env::var("SESSION_COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Build a Set-Cookie header value that expires the session cookie.
pub fn build_clear_session_cookie() -> HeaderValue {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .secure(cookie_secure())
        .build();
    // Name and value are fixed ASCII, so the header is always valid.
    HeaderValue::from_str(&cookie.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("__session=; Max-Age=0; Path=/"))
}

/// Extract the session token from the session cookie (preferred) or a
/// Bearer header (REST clients).
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SESSION_COOKIE) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Parse a specific cookie value from the Cookie headers.
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// Pending cookie change picked up by the session middleware after the
/// handler runs.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingCookieAction {
    ClearSession,
}

/// Slot through which server functions hand cookie changes to the middleware.
#[derive(Clone, Debug, Default)]
pub struct CookieSlot(pub Arc<Mutex<Option<PendingCookieAction>>>);

impl CookieSlot {
    pub fn schedule(&self, action: PendingCookieAction) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = Some(action);
    }

    pub fn take(&self) -> Option<PendingCookieAction> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

/// Schedule the session cookie to be cleared on the current response.
/// Called from server functions.
pub fn schedule_clear_session() {
    if let Some(ctx) = dioxus::fullstack::FullstackContext::current() {
        let parts = ctx.parts_mut();
        if let Some(slot) = parts.extensions.get::<CookieSlot>() {
            slot.schedule(PendingCookieAction::ClearSession);
        }
    }
}
