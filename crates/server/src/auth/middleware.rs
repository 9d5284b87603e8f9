use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::jwt::validate_session_token;

/// Permissive session middleware.
///
/// On each request:
/// 1. Verifies the provider session token (cookie or Bearer header) and
///    inserts its `Claims` into request extensions
/// 2. Inserts a `CookieSlot` so server functions can schedule cookie changes
/// 3. After the handler runs, applies any pending cookie action
///
/// Does NOT reject unauthenticated requests; extractors decide authorization.
pub async fn session_middleware(mut req: Request, next: Next) -> Response {
    if let Some(token) = cookies::extract_session_token(req.headers()) {
        match validate_session_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
            }
        }
    }

    let cookie_slot = CookieSlot::default();
    req.extensions_mut().insert(cookie_slot.clone());

    let mut response = next.run(req).await;

    if let Some(PendingCookieAction::ClearSession) = cookie_slot.take() {
        response
            .headers_mut()
            .append(header::SET_COOKIE, cookies::build_clear_session_cookie());
    }

    response
}
