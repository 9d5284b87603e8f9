use axum::Router;
use shared_types::{AppError, AppErrorKind, Profile, Role, SyncUserResponse, UpdateRoleRequest};
use sqlx::{Pool, Postgres};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::{health, rest};

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::sync_user::sync_user,
        rest::profile::get_my_profile,
        rest::profile::list_profiles,
        rest::profile::update_profile_role,
        health::health_check,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        Profile,
        Role,
        SyncUserResponse,
        UpdateRoleRequest,
        health::HealthResponse,
    )),
    tags(
        (name = "profiles", description = "Profile provisioning and lookup"),
        (name = "admin", description = "Role administration"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Print Shop API",
        description = "Identity-linked profiles and roles for the print shop back-office",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the Axum router serving the REST API, `/health`, and the API
/// reference at `/docs`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    let state = AppState::new(pool);

    Router::new()
        .merge(rest::api_router(state.sync_limit.clone()))
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
