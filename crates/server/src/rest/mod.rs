pub mod profile;
pub mod sync_user;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::db::AppState;
use crate::rate_limit::{rate_limit_middleware, RateLimitState};

/// Build the REST API router.
///
/// `POST /sync-user` carries its own rate limit so a misbehaving client
/// cannot hammer the profile table; the read endpoints are unlimited.
pub fn api_router(sync_limit: RateLimitState) -> Router<AppState> {
    let provisioning = Router::new()
        .route("/sync-user", post(sync_user::sync_user))
        .route_layer(middleware::from_fn_with_state(
            sync_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .merge(provisioning)
        // Profiles
        .route("/api/profiles/me", get(profile::get_my_profile))
        // Admin
        .route("/api/admin/profiles", get(profile::list_profiles))
        .route("/api/admin/profiles/{id}/role", put(profile::update_profile_role))
}
