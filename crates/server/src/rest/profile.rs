use axum::{
    extract::{Path, State},
    Json,
};
use shared_types::{AppError, Profile, Role, UpdateRoleRequest};
use sqlx::{Pool, Postgres};
use std::collections::HashMap;

use crate::auth::extractors::{AdminRequired, AuthRequired};
use crate::error_convert::ValidateRequest;
use crate::repo::profile;

/// GET /api/profiles/me
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Caller's profile", body = Profile),
        (status = 401, description = "No verified session", body = AppError),
        (status = 404, description = "Profile not provisioned yet", body = AppError)
    ),
    tag = "profiles"
)]
pub async fn get_my_profile(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Profile>, AppError> {
    let profile = profile::find_by_id(&pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;
    Ok(Json(profile))
}

/// GET /api/admin/profiles
#[utoipa::path(
    get,
    path = "/api/admin/profiles",
    responses(
        (status = 200, description = "All profiles", body = Vec<Profile>),
        (status = 401, description = "No verified session", body = AppError),
        (status = 403, description = "Caller is not an admin", body = AppError)
    ),
    tag = "admin"
)]
pub async fn list_profiles(
    State(pool): State<Pool<Postgres>>,
    _admin: AdminRequired,
) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = profile::list_all(&pool).await?;
    Ok(Json(profiles))
}

/// PUT /api/admin/profiles/{id}/role
#[utoipa::path(
    put,
    path = "/api/admin/profiles/{id}/role",
    params(("id" = String, Path, description = "Identity id of the profile")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Profile),
        (status = 403, description = "Caller is not an admin", body = AppError),
        (status = 404, description = "Unknown profile", body = AppError),
        (status = 422, description = "Invalid role", body = AppError)
    ),
    tag = "admin"
)]
pub async fn update_profile_role(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<Profile>, AppError> {
    body.validate_request()?;
    let role = parse_role(&body.role)?;

    let updated = profile::set_role(&pool, &id, role)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))?;

    tracing::info!(
        profile_id = %id,
        %role,
        assigned_by = %admin.claims.sub,
        "Profile role assigned"
    );
    Ok(Json(updated))
}

/// Parse a requested role, rejecting unknown names with a field error.
pub(crate) fn parse_role(raw: &str) -> Result<Role, AppError> {
    Role::parse(raw).ok_or_else(|| {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "role".to_string(),
            "Role must be one of admin, editor, cliente".to_string(),
        );
        AppError::validation("Invalid role", field_errors)
    })
}
