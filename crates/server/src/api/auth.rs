// Server-only auth helpers shared by the api/* server functions.

use dioxus::prelude::*;
use shared_types::{AppError, Role};

use crate::auth::jwt::Claims;
use crate::db::get_db;
use crate::error_convert::AppErrorExt;
use crate::repo::profile;

/// Claims of the caller when signed in.
///
/// Reads the claims the session middleware verified; falls back to parsing
/// the token itself for requests that bypassed the middleware.
pub(crate) fn current_claims() -> Option<Claims> {
    use crate::auth::{cookies, jwt};

    let ctx = dioxus::fullstack::FullstackContext::current()?;
    let parts = ctx.parts_mut();

    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Some(claims.clone());
    }

    let token = cookies::extract_session_token(&parts.headers)?;
    jwt::validate_session_token(&token).ok()
}

/// Require a verified session. Returns the caller's claims.
pub(crate) fn require_auth() -> Result<Claims, ServerFnError> {
    current_claims()
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())
}

/// Require a verified session whose profile holds exactly `required`.
pub(crate) async fn require_role(required: Role) -> Result<Claims, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await.map_err(|e| e.into_server_fn_error())?;

    match profile::find_role(db, &claims.sub).await {
        Ok(Some(role)) if role == required => Ok(claims),
        Ok(_) => Err(AppError::forbidden(format!("{required} role required")).into_server_fn_error()),
        Err(e) => Err(e.into_server_fn_error()),
    }
}

/// Require the caller to be an admin.
pub(crate) async fn require_admin() -> Result<Claims, ServerFnError> {
    require_role(Role::Admin).await
}
