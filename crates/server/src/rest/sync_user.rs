use axum::{extract::State, Json};
use shared_types::{AppError, Identity, SyncUserResponse};
use sqlx::{Pool, Postgres};

use crate::auth::{extractors::AuthRequired, initial_role_for};
use crate::repo::profile;

/// Ensure a profile row exists for `identity`.
///
/// Inserts with the initial role when absent and leaves an existing row
/// alone, so repeated calls are harmless. Shared by the REST endpoint and
/// the `sync_user` server function.
pub async fn provision_identity(
    pool: &Pool<Postgres>,
    identity: &Identity,
) -> Result<SyncUserResponse, AppError> {
    if identity.email.trim().is_empty() {
        return Err(AppError::bad_request("Session has no email address"));
    }

    let role = initial_role_for(&identity.email);
    let created = profile::insert_if_absent(pool, &identity.id, &identity.email, role).await?;

    if created {
        tracing::info!(identity_id = %identity.id, %role, "Profile provisioned");
    } else {
        tracing::debug!(identity_id = %identity.id, "Profile already present");
    }

    Ok(SyncUserResponse {
        id: identity.id.clone(),
        created,
    })
}

/// POST /sync-user
#[utoipa::path(
    post,
    path = "/sync-user",
    responses(
        (status = 200, description = "Profile exists for the caller", body = SyncUserResponse),
        (status = 400, description = "Session carries no email", body = AppError),
        (status = 401, description = "No verified session", body = AppError),
        (status = 429, description = "Too many provisioning calls", body = AppError)
    ),
    tag = "profiles"
)]
pub async fn sync_user(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<SyncUserResponse>, AppError> {
    let response = provision_identity(&pool, &claims.identity()).await?;
    Ok(Json(response))
}
