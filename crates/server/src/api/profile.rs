use dioxus::prelude::*;
use shared_types::{Profile, Role, SyncUserResponse};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::{AppErrorExt, ValidateRequest};

#[cfg(feature = "server")]
use super::auth::*;

/// Role stored on the profile of `identity_id`, or `None` when no profile
/// exists yet. Callers may only read their own profile.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_profile_role(identity_id: String) -> Result<Option<Role>, ServerFnError> {
    use shared_types::AppError;

    let claims = require_auth()?;
    if claims.sub != identity_id {
        return Err(AppError::forbidden("Cannot read another account's role").into_server_fn_error());
    }

    let db = get_db().await.map_err(|e| e.into_server_fn_error())?;
    crate::repo::profile::find_role(db, &identity_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Ensure the caller has a profile. Idempotent; an existing role is never
/// changed.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn sync_user() -> Result<SyncUserResponse, ServerFnError> {
    use crate::rate_limit::{subject_key, sync_user_limiter};

    let claims = require_auth()?;
    sync_user_limiter()
        .enforce(&subject_key(&claims.sub))
        .map_err(|e| e.into_server_fn_error())?;
    let db = get_db().await.map_err(|e| e.into_server_fn_error())?;
    crate::rest::sync_user::provision_identity(db, &claims.identity())
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Every profile, oldest first. Admin only.
#[server]
pub async fn list_profiles() -> Result<Vec<Profile>, ServerFnError> {
    require_admin().await?;
    let db = get_db().await.map_err(|e| e.into_server_fn_error())?;
    crate::repo::profile::list_all(db)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Assign a role out of band. Admin only.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn set_profile_role(id: String, role: String) -> Result<Profile, ServerFnError> {
    use shared_types::{AppError, UpdateRoleRequest};

    let admin = require_admin().await?;

    let req = UpdateRoleRequest { role };
    req.validate_request().map_err(|e| e.into_server_fn_error())?;
    let role = crate::rest::profile::parse_role(&req.role).map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await.map_err(|e| e.into_server_fn_error())?;
    let updated = crate::repo::profile::set_role(db, &id, role)
        .await
        .map_err(|e| e.into_server_fn_error())?
        .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")).into_server_fn_error())?;

    tracing::info!(profile_id = %id, %role, assigned_by = %admin.sub, "Profile role assigned");
    Ok(updated)
}
