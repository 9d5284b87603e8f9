use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization level stored on a profile.
///
/// - `Admin`: back-office owner, manages roles and every admin screen.
/// - `Editor`: maintains catalog and gallery content.
/// - `Cliente`: customer account; the role every new profile starts with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Cliente,
}

impl Role {
    /// Role given to freshly provisioned profiles and to identities whose
    /// profile could not be provisioned.
    pub const DEFAULT: Role = Role::Cliente;

    /// Parse a stored role string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "editor" => Some(Role::Editor),
            "cliente" => Some(Role::Cliente),
            _ => None,
        }
    }

    /// Parse a stored role string, mapping unknown values to the least
    /// privileged role.
    pub fn from_str_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or(Role::DEFAULT)
    }

    /// Lowercase string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Cliente => "cliente",
        }
    }

    /// Numeric code used by the `RoleRequired<ROLE>` extractor.
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Role::Admin,
            1 => Role::Editor,
            _ => Role::Cliente,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in user as reported by the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Identity {
    /// Stable provider-assigned user id.
    pub id: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Application-owned record mapping an identity to its role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
