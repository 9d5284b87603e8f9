use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

/// Response body of `POST /sync-user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SyncUserResponse {
    pub id: String,
    /// `true` when this call inserted the profile, `false` when it already existed.
    pub created: bool,
}

/// Request DTO for assigning a role to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct UpdateRoleRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Role is required"))
    )]
    pub role: String,
}

/// Hosted identity-provider screens the client hands off to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthLinks {
    /// `None` when no identity provider is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_url: Option<String>,
    /// `None` when sign-up is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_up_url: Option<String>,
}
