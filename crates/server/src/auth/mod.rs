pub mod cookies;
pub mod extractors;
pub mod jwt;
pub mod middleware;

use shared_types::Role;

/// Check if the given email matches the `ADMIN_EMAIL` env var (case-insensitive).
/// Returns `false` if the env var is empty or unset.
pub fn is_admin_email(email: &str) -> bool {
    match std::env::var("ADMIN_EMAIL") {
        Ok(admin) if !admin.trim().is_empty() => admin.trim().eq_ignore_ascii_case(email),
        _ => false,
    }
}

/// Role a profile is created with. The `ADMIN_EMAIL` account starts as
/// admin so the shop owner can bootstrap the back-office; everyone else
/// starts with the default role.
///
/// Only applies when the profile is first inserted; existing roles are
/// never touched.
pub fn initial_role_for(email: &str) -> Role {
    if !email.is_empty() && is_admin_email(email) {
        Role::Admin
    } else {
        Role::DEFAULT
    }
}
