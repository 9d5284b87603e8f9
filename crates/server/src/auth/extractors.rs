use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use shared_types::{AppError, Role};
use sqlx::{Pool, Postgres};

use super::jwt::Claims;
use crate::repo::profile;

/// Extractor that requires a verified session. Returns 401 otherwise.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor that optionally extracts session claims. Never fails.
pub struct MaybeAuth(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<Claims>().cloned()))
    }
}

/// Role codes for [`RoleRequired`] (match [`Role::from_code`]).
pub const CLIENTE: u8 = 0;
pub const EDITOR: u8 = 1;
pub const ADMIN: u8 = 2;

/// Extractor that requires a verified session AND a profile whose role
/// equals `ROLE`. Returns 401 if unauthenticated, 403 if the profile is
/// missing or holds another role.
///
/// The role is read from the profile store on every request so role
/// changes take effect immediately.
pub struct RoleRequired<const ROLE: u8> {
    pub claims: Claims,
    pub role: Role,
}

pub type AdminRequired = RoleRequired<ADMIN>;

impl<const ROLE: u8, S> FromRequestParts<S> for RoleRequired<ROLE>
where
    S: Send + Sync,
    Pool<Postgres>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let required = Role::from_code(ROLE);
        let pool = Pool::<Postgres>::from_ref(state);
        let role = profile::find_role(&pool, &claims.sub)
            .await?
            .ok_or_else(|| AppError::forbidden("No profile for this account"))?;

        if role != required {
            return Err(AppError::forbidden(format!("{required} role required")));
        }

        Ok(RoleRequired { claims, role })
    }
}
